use id_arena::Id;

pub type MeshId = Id<Mesh>;

/// Geometry summary attached to objects. Several objects may share one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    pub name: String,
    pub vertex_count: usize,
    pub primitive_count: usize,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertex_count: usize, primitive_count: usize) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            primitive_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} vertices in {} primitive(s)",
            self.name, self.vertex_count, self.primitive_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_vertices_and_primitives() {
        let mesh = Mesh::new("Door", 128, 2);

        assert!(!mesh.is_empty());
        assert_eq!(mesh.summary(), "Door: 128 vertices in 2 primitive(s)");
    }

    #[test]
    fn zero_vertices_is_empty() {
        assert!(Mesh::new("ColliderProxy", 0, 1).is_empty());
    }
}
