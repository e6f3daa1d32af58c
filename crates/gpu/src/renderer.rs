use foundation::math::{Mat4, Vec3, mat4_transform_point};
use scene::components::{Geometry, Light, Material, SegmentBuffer, Starfield};
use scene::entity::NodeId;
use scene::graph::{NodeKind, SceneGraph};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind<'g> {
    Mesh(Geometry),
    Lines(&'g SegmentBuffer),
    Points(Starfield),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand<'g> {
    pub node: NodeId,
    pub name: &'static str,
    pub world: Mat4,
    pub material: Material,
    pub kind: DrawKind<'g>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightCommand {
    pub node: NodeId,
    pub light: Light,
    /// World-space position of the light node.
    pub position: Vec3,
}

/// Everything needed to draw one frame, borrowed from the scene graph.
///
/// Opaque draws come first, then blended ones; both in tree order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderFrame<'g> {
    pub commands: Vec<DrawCommand<'g>>,
    pub lights: Vec<LightCommand>,
    blended_start: usize,
}

impl<'g> RenderFrame<'g> {
    pub fn opaque(&self) -> &[DrawCommand<'g>] {
        &self.commands[..self.blended_start]
    }

    pub fn blended(&self) -> &[DrawCommand<'g>] {
        &self.commands[self.blended_start..]
    }

    pub fn find(&self, name: &str) -> Option<&DrawCommand<'g>> {
        self.commands.iter().find(|c| c.name == name)
    }
}

pub struct Renderer;

impl Renderer {
    pub fn collect(graph: &SceneGraph) -> RenderFrame<'_> {
        let mut opaque = Vec::new();
        let mut blended = Vec::new();
        let mut lights = Vec::new();

        graph.visit_visible(|node_id, node, world| {
            let (kind, material) = match &node.kind {
                NodeKind::Group => return,
                NodeKind::Light(light) => {
                    lights.push(LightCommand {
                        node: node_id,
                        light: *light,
                        position: mat4_transform_point(world, Vec3::ZERO),
                    });
                    return;
                }
                NodeKind::Mesh { geometry, material } => (DrawKind::Mesh(*geometry), *material),
                NodeKind::Lines { segments, material } => {
                    if segments.is_empty() {
                        return;
                    }
                    (DrawKind::Lines(segments), *material)
                }
                NodeKind::Points {
                    starfield,
                    material,
                } => (DrawKind::Points(*starfield), *material),
            };
            let command = DrawCommand {
                node: node_id,
                name: node.name,
                world,
                material,
                kind,
            };
            if material.is_blended() {
                blended.push(command);
            } else {
                opaque.push(command);
            }
        });

        let blended_start = opaque.len();
        opaque.extend(blended);
        RenderFrame {
            commands: opaque,
            lights,
            blended_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawKind, Renderer};
    use foundation::color::Rgb;
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;
    use scene::components::{Geometry, Light, Material, SegmentBuffer, Transform};
    use scene::graph::{Node, SceneGraphBuilder};

    #[test]
    fn opaque_draws_precede_blended_in_tree_order() {
        let mut builder = SceneGraphBuilder::new();
        builder.push(Node::mesh(
            "halo",
            Geometry::sphere(3.0, 8),
            Material::phong(Rgb::WHITE).additive(),
        ));
        builder.open(Node::group("group"));
        builder.push(Node::mesh(
            "body",
            Geometry::sphere(2.5, 8),
            Material::surface(),
        ));
        builder.push(Node::lines(
            "lines",
            SegmentBuffer::new(vec![[Vec3::ZERO, Vec3::Y]]),
            Material::basic(Rgb::WHITE).transparent(0.5),
        ));
        builder.push(Node::lines(
            "empty",
            SegmentBuffer::default(),
            Material::basic(Rgb::WHITE),
        ));
        let graph = builder.build();

        let frame = Renderer::collect(&graph);
        let names: Vec<_> = frame.commands.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["body", "halo", "lines"]);
        assert_eq!(frame.opaque().len(), 1);
        assert_eq!(frame.blended().len(), 2);
        assert!(matches!(
            frame.find("lines").map(|c| &c.kind),
            Some(DrawKind::Lines(s)) if s.len() == 1
        ));
    }

    #[test]
    fn lights_carry_world_position() {
        let mut builder = SceneGraphBuilder::new();
        builder.open(
            Node::group("offset").with_transform(Transform::translate(Vec3::new(1.0, 0.0, 0.0))),
        );
        builder.push(
            Node::light(
                "lamp",
                Light::Point {
                    color: Rgb::WHITE,
                    intensity: 2.0,
                    distance: 0.5,
                    decay: 2.0,
                },
            )
            .with_transform(Transform::translate(Vec3::new(0.0, 2.0, 0.0))),
        );
        let graph = builder.build();

        let frame = Renderer::collect(&graph);
        assert!(frame.commands.is_empty());
        assert_eq!(frame.lights.len(), 1);
        assert!((frame.lights[0].position - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }
}
