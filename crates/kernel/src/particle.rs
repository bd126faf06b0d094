//! Particle records and their wire representations.
//!
//! `Particle` is `#[repr(C)]` and `bytemuck::Pod` so the same record serves
//! as the in-memory state and the inter-unit message payload: a slice of
//! particles casts directly to bytes for exchange, with no bespoke codec.

use bytemuck::{Pod, Zeroable};

/// A single simulated particle.
///
/// The identity is assigned once at initialization (1..=N) and never
/// reused; it keeps snapshot output order-stable and disambiguates
/// particles across ownership transfers.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Particle {
    /// Stable 64-bit identity.
    pub id: u64,
    /// Position X
    pub x: f64,
    /// Position Y
    pub y: f64,
    /// Velocity X
    pub vx: f64,
    /// Velocity Y
    pub vy: f64,
    /// Acceleration X (recomputed from scratch every step)
    pub ax: f64,
    /// Acceleration Y
    pub ay: f64,
}

/// Position-only wire record for ghost exchange.
///
/// A non-owning neighbor only needs positions to evaluate forces, so ghost
/// messages ship this reduced record instead of the full `Particle`.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GhostParticle {
    /// Identity of the owning particle (diagnostics only).
    pub id: u64,
    /// Position X
    pub x: f64,
    /// Position Y
    pub y: f64,
}

impl GhostParticle {
    /// Reduce a full particle to its ghost wire form.
    pub fn from_particle(p: &Particle) -> Self {
        Self { id: p.id, x: p.x, y: p.y }
    }

    /// Materialize a read-only local copy. Velocity and acceleration are
    /// zeroed; a ghost is never integrated, so they are never read.
    pub fn materialize(&self) -> Particle {
        Particle {
            id: self.id,
            x: self.x,
            y: self.y,
            vx: 0.0,
            vy: 0.0,
            ax: 0.0,
            ay: 0.0,
        }
    }
}

/// Ownership tag for an entry in the spatial index.
///
/// Ghosts participate in force evaluation as sources but are never
/// integrated or migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleTag {
    /// Resident particle, integrated and migrated by this unit.
    Owned,
    /// Read-only copy replicated from a neighboring unit this step.
    Ghost,
}

/// Encode a particle slice into a byte buffer for transfer between units.
pub fn encode<T: Pod>(records: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(records).to_vec()
}

/// Decode a byte buffer received from another unit.
///
/// Copies into a fresh vector so the payload's alignment does not matter.
pub fn decode<T: Pod>(bytes: &[u8]) -> Vec<T> {
    bytemuck::pod_collect_to_vec(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_layout_is_packed() {
        // 1x u64 + 6x f64, no padding: this is the wire contract.
        assert_eq!(std::mem::size_of::<Particle>(), 56);
        assert_eq!(std::mem::size_of::<GhostParticle>(), 24);
    }

    #[test]
    fn encode_decode_round_trip() {
        let parts = vec![
            Particle { id: 1, x: 0.5, y: 0.25, vx: -1.0, vy: 1.0, ax: 0.0, ay: 0.0 },
            Particle { id: 2, x: 0.1, y: 0.9, vx: 0.3, vy: -0.7, ax: 2.0, ay: -2.0 },
        ];
        let bytes = encode(&parts);
        assert_eq!(bytes.len(), 2 * 56);
        let back: Vec<Particle> = decode(&bytes);
        assert_eq!(back, parts);
    }

    #[test]
    fn decode_survives_unaligned_input() {
        let parts = vec![Particle { id: 7, x: 1.0, y: 2.0, vx: 0.0, vy: 0.0, ax: 0.0, ay: 0.0 }];
        let mut bytes = vec![0u8; 1];
        bytes.extend_from_slice(&encode(&parts));
        let back: Vec<Particle> = decode(&bytes[1..]);
        assert_eq!(back, parts);
    }

    #[test]
    fn ghost_materializes_position_only() {
        let p = Particle { id: 3, x: 0.2, y: 0.4, vx: 5.0, vy: -5.0, ax: 1.0, ay: 1.0 };
        let g = GhostParticle::from_particle(&p).materialize();
        assert_eq!(g.id, 3);
        assert_eq!(g.x, 0.2);
        assert_eq!(g.y, 0.4);
        assert_eq!(g.vx, 0.0);
        assert_eq!(g.ay, 0.0);
    }
}
