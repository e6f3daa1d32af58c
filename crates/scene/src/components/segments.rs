use foundation::math::Vec3;

/// Flat list of line segments, one `[start, end]` pair per polyline edge.
///
/// Built once and immutable afterwards; the scene node that holds it is its
/// only owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentBuffer {
    segments: Vec<[Vec3; 2]>,
}

impl SegmentBuffer {
    pub fn new(segments: Vec<[Vec3; 2]>) -> Self {
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[[Vec3; 2]] {
        &self.segments
    }

    /// Two vertices per segment.
    pub fn vertex_count(&self) -> usize {
        self.segments.len() * 2
    }

    /// Vertex positions in line-list order, ready for upload.
    pub fn vertices_f32(&self) -> Vec<[f32; 3]> {
        self.segments
            .iter()
            .flat_map(|[a, b]| [a.to_f32(), b.to_f32()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::SegmentBuffer;
    use foundation::math::Vec3;

    #[test]
    fn flattens_in_line_list_order() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        let buf = SegmentBuffer::new(vec![[a, b], [b, c]]);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.vertex_count(), 4);
        assert_eq!(
            buf.vertices_f32(),
            vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        );
    }
}
