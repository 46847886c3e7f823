use rand::Rng;

/// Floats per interleaved vertex: position then colour.
pub const VERTEX_STRIDE: usize = 6;

#[rustfmt::skip]
pub const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [-0.75, -0.5, 0.0],
    [0.75, -0.5, 0.0],
    [0.75, 0.5, 0.0],
    [-0.75, 0.5, 0.0],
];

/// Two counter-clockwise triangles sharing the 0-2 diagonal.
#[rustfmt::skip]
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub colour: [f32; 3],
}

/// The single quad the demo draws, each corner with its own colour.
#[derive(Debug, Clone)]
pub struct Quad {
    vertices: [Vertex; 4],
}

impl Quad {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let vertices = QUAD_POSITIONS.map(|position| Vertex {
            position,
            colour: [
                random_channel(rng),
                random_channel(rng),
                random_channel(rng),
            ],
        });

        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex; 4] {
        &self.vertices
    }

    pub fn indices(&self) -> &'static [u32] {
        &QUAD_INDICES
    }

    /// Interleaved `x, y, z, r, g, b` data ready for upload.
    pub fn vertex_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertices.len() * VERTEX_STRIDE);

        for vertex in &self.vertices {
            data.extend_from_slice(&vertex.position);
            data.extend_from_slice(&vertex.colour);
        }

        data
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices()
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }
}

/// One of `0.01, 0.02, ..., 1.00`, never fully dark.
pub fn random_channel<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(1..=100_u32) as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn two_triangles_share_diagonal() {
        let quad = Quad::random(&mut SmallRng::seed_from_u64(0));
        let triangles = quad.triangles().collect::<Vec<_>>();

        assert_eq!(triangles, vec![[0, 1, 2], [2, 3, 0]]);

        for tri in &triangles {
            assert!(tri.contains(&0) && tri.contains(&2));
            assert!(tri.iter().all(|&i| (i as usize) < quad.vertices().len()));
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        let quad = Quad::random(&mut SmallRng::seed_from_u64(0));

        for [a, b, c] in quad.triangles() {
            let a = quad.vertices()[a as usize].position;
            let b = quad.vertices()[b as usize].position;
            let c = quad.vertices()[c as usize].position;

            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0);
        }
    }

    #[test]
    fn channels_are_in_range() {
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..1000 {
            let c = random_channel(&mut rng);
            assert!((0.01..=1.0).contains(&c));
            assert_eq!((c * 100.0).round() / 100.0, c);
        }
    }

    #[test]
    fn interleaved_layout() {
        let quad = Quad::random(&mut SmallRng::seed_from_u64(11));
        let data = quad.vertex_data();

        assert_eq!(data.len(), 4 * VERTEX_STRIDE);

        for (vertex, chunk) in quad.vertices().iter().zip(data.chunks_exact(VERTEX_STRIDE)) {
            assert_eq!(&chunk[..3], &vertex.position);
            assert_eq!(&chunk[3..], &vertex.colour);
        }
    }

    #[test]
    fn seeded_colours_repeat() {
        let a = Quad::random(&mut SmallRng::seed_from_u64(42));
        let b = Quad::random(&mut SmallRng::seed_from_u64(42));

        assert_eq!(a.vertices(), b.vertices());
    }
}
