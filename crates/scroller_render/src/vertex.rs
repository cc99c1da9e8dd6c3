#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

/// Two triangles covering clip space. Texture V runs downwards, matching the
/// raster canvas's top-left origin.
pub const FULLSCREEN_QUAD: [FrameVertex; 6] = [
    FrameVertex {
        position: [-1.0, -1.0],
        tex_coords: [0.0, 1.0],
    },
    FrameVertex {
        position: [1.0, -1.0],
        tex_coords: [1.0, 1.0],
    },
    FrameVertex {
        position: [1.0, 1.0],
        tex_coords: [1.0, 0.0],
    },
    FrameVertex {
        position: [-1.0, -1.0],
        tex_coords: [0.0, 1.0],
    },
    FrameVertex {
        position: [1.0, 1.0],
        tex_coords: [1.0, 0.0],
    },
    FrameVertex {
        position: [-1.0, 1.0],
        tex_coords: [0.0, 0.0],
    },
];

impl FrameVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FrameVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(FrameVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(FrameVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_clip_space_with_flipped_v() {
        for vertex in &FULLSCREEN_QUAD {
            let [x, y] = vertex.position;
            let [u, v] = vertex.tex_coords;
            assert_eq!(u, (x + 1.0) * 0.5);
            assert_eq!(v, (1.0 - y) * 0.5);
        }
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<FrameVertex>(), 16);
        assert_eq!(bytemuck::cast_slice::<FrameVertex, u8>(&FULLSCREEN_QUAD).len(), 96);
    }
}
