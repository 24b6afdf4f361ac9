//! The furnished room

use std::{cell::Cell, rc::Rc};

use scenery::{
    scene::{
        CameraNode, Geometry, LightNode, NodeRef, PresentationNode, ProgramInterface, Scene,
        SceneError, SceneNode, SceneState, ShaderNode, TransformNode,
    },
    Color, ConfigParams, HomeView,
};
use scenery_geom::{Vec3, Vec4};

pub fn home_view() -> HomeView {
    HomeView {
        eye: Vec3::new(0.0, -100.0, 20.0),
        look_at: Vec3::new(0.0, 0.0, 20.0),
        up: Vec3::pos_z(),
    }
}

/// Stand-in for an uploaded vertex array. Checks that a lighting program is
/// bound and counts the draw calls it would have issued.
pub struct Shape {
    name: &'static str,
    draws: Cell<u64>,
}

impl Shape {
    pub fn new(name: &'static str) -> Rc<Shape> {
        Rc::new(Shape {
            name,
            draws: Cell::new(0),
        })
    }

    pub fn draws(&self) -> u64 {
        self.draws.get()
    }
}

impl Geometry for Shape {
    fn name(&self) -> &str {
        self.name
    }

    fn draw(&self, state: &SceneState) -> Result<(), SceneError> {
        let shader = state.shader().ok_or_else(|| SceneError::Geometry {
            name: self.name.to_string(),
            reason: "no lighting shader bound".to_string(),
        })?;
        let origin = state.pvm_matrix() * Vec4::point(Vec3::zero());
        log::trace!(
            "{} at clip {:?}, pvm loc {}, shininess {}",
            self.name,
            origin,
            shader.locations.pvm_matrix,
            state.material().shininess
        );
        self.draws.set(self.draws.get() + 1);
        Ok(())
    }
}

fn transform<F: FnOnce(&mut TransformNode)>(build: F) -> NodeRef {
    let mut node = TransformNode::new();
    build(&mut node);
    SceneNode::new_transform(node)
}

fn material(ambient: Color, diffuse: Color, specular: Color, shininess: f32) -> NodeRef {
    SceneNode::new_presentation(PresentationNode::new(
        ambient,
        diffuse,
        specular,
        Color::black(),
        shininess,
    ))
}

fn group(name: &str) -> NodeRef {
    let node = SceneNode::new_empty();
    node.borrow_mut().set_name(name);
    node
}

/// Adds `material -> transform -> geometry` under `parent`.
fn add_sub_tree(
    parent: &NodeRef,
    material: NodeRef,
    transform: NodeRef,
    geometry: NodeRef,
) -> Result<(), SceneError> {
    SceneNode::add_chain(parent, vec![material, transform, geometry]).map(|_| ())
}

fn construct_room(unit_square: &NodeRef) -> Result<NodeRef, SceneError> {
    let floor_transform = transform(|t| {
        t.scale(200.0, 200.0, 1.0);
    });
    let backwall_transform = transform(|t| {
        t.translate(0.0, 100.0, 40.0).rotate_x(90.0).scale(200.0, 80.0, 1.0);
    });
    let frontwall_transform = transform(|t| {
        t.translate(0.0, -100.0, 40.0).rotate_x(-90.0).scale(200.0, 80.0, 1.0);
    });
    let leftwall_transform = transform(|t| {
        t.translate(-100.0, 0.0, 40.0).rotate_y(90.0).scale(80.0, 200.0, 1.0);
    });
    let rightwall_transform = transform(|t| {
        t.translate(100.0, 0.0, 40.0).rotate_y(-90.0).scale(80.0, 200.0, 1.0);
    });
    let ceiling_transform = transform(|t| {
        t.translate(0.0, 0.0, 80.0).rotate_x(180.0).scale(200.0, 200.0, 1.0);
    });

    let floor_material = material(
        Color::rgb(0.15, 0.22, 0.05),
        Color::rgb(0.3, 0.45, 0.1),
        Color::gray(0.1),
        5.0,
    );
    let wall_material = material(
        Color::rgb(0.35, 0.225, 0.275),
        Color::rgb(0.7, 0.55, 0.55),
        Color::gray(0.4),
        16.0,
    );
    let ceiling_material = material(Color::gray(0.75), Color::white(), Color::gray(0.9), 64.0);

    let room = group("Room");
    SceneNode::add_child(&room, Rc::clone(&wall_material))?;
    for wall in vec![
        backwall_transform,
        leftwall_transform,
        rightwall_transform,
        frontwall_transform,
    ] {
        SceneNode::add_child(&wall_material, Rc::clone(&wall))?;
        SceneNode::add_child(&wall, Rc::clone(unit_square))?;
    }
    add_sub_tree(&room, floor_material, floor_transform, Rc::clone(unit_square))?;
    add_sub_tree(&room, ceiling_material, ceiling_transform, Rc::clone(unit_square))?;
    Ok(room)
}

/// Six outward facing sides around the origin.
fn construct_unit_box(unit_square: &NodeRef) -> Result<NodeRef, SceneError> {
    let sides = vec![
        transform(|t| {
            t.translate(0.0, 0.5, 0.0).rotate_x(-90.0);
        }),
        transform(|t| {
            t.translate(-0.5, 0.0, 0.0).rotate_y(-90.0);
        }),
        transform(|t| {
            t.translate(0.5, 0.0, 0.0).rotate_y(90.0);
        }),
        transform(|t| {
            t.translate(0.0, -0.5, 0.0).rotate_x(90.0);
        }),
        transform(|t| {
            t.translate(0.0, 0.0, -0.5).rotate_x(180.0);
        }),
        transform(|t| {
            t.translate(0.0, 0.0, 0.5);
        }),
    ];
    let unit_box = group("Unit box");
    for side in sides {
        SceneNode::add_child(&unit_box, Rc::clone(&side))?;
        SceneNode::add_child(&side, Rc::clone(unit_square))?;
    }
    Ok(unit_box)
}

fn construct_table(unit_box: &NodeRef, leg: &NodeRef) -> Result<NodeRef, SceneError> {
    let table = group("Table");
    let top = transform(|t| {
        t.translate(0.0, 0.0, 23.0).scale(60.0, 30.0, 6.0);
    });
    SceneNode::add_child(&table, Rc::clone(&top))?;
    SceneNode::add_child(&top, Rc::clone(unit_box))?;
    for &(x, y) in [(-20.0, -10.0), (20.0, -10.0), (-20.0, 10.0), (20.0, 10.0)].iter() {
        let leg_transform = transform(|t| {
            t.translate(x, y, 10.0).scale(6.0, 6.0, 20.0);
        });
        SceneNode::add_child(&table, Rc::clone(&leg_transform))?;
        SceneNode::add_child(&leg_transform, Rc::clone(leg))?;
    }
    Ok(table)
}

fn construct_lights(parent: &NodeRef) -> Result<(), SceneError> {
    // dim point light in the back right corner
    let corner = LightNode::new(
        0,
        Vec4::new(75.0, 75.0, 30.0, 1.0),
        Color::black(),
        Color::gray(0.5),
        Color::gray(0.5),
    );
    // brighter light straight down from above
    let overhead = LightNode::new(
        1,
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Color::black(),
        Color::gray(0.7),
        Color::gray(0.7),
    );
    SceneNode::add_child(parent, SceneNode::new_light(corner))?;
    SceneNode::add_child(parent, SceneNode::new_light(overhead))?;
    Ok(())
}

/// Builds the whole graph: shader, camera, lights, then the furniture.
pub fn construct_scene(params: &ConfigParams) -> Result<Scene, SceneError> {
    let max_lights = params.render.max_lights;
    let mut shader = ShaderNode::new(&ProgramInterface::lighting(max_lights), max_lights)?;
    shader.set_global_ambient(Color::gray(0.4));

    let home = home_view();
    let mut camera = CameraNode::new();
    camera.set_position(home.eye);
    camera.set_look_at_pt(home.look_at);
    camera.set_view_up(home.up);
    camera.set_perspective(50.0, params.viewport.aspect(), 1.0, 300.0)?;

    let root = group("Root");
    let shader = SceneNode::new_shader(shader);
    let camera = SceneNode::new_camera(camera);
    SceneNode::add_chain(&root, vec![Rc::clone(&shader), Rc::clone(&camera)])?;
    construct_lights(&camera)?;

    let unit_square = SceneNode::new_geometry(Shape::new("unit square"));
    let cylinder = SceneNode::new_geometry(Shape::new("cylinder"));
    let cone = SceneNode::new_geometry(Shape::new("cone"));

    SceneNode::add_child(&camera, construct_room(&unit_square)?)?;

    let unit_box = construct_unit_box(&unit_square)?;
    let table = construct_table(&unit_box, &cylinder)?;
    let wood = material(
        Color::rgb(0.275, 0.225, 0.075),
        Color::rgb(0.55, 0.45, 0.15),
        Color::gray(0.3),
        64.0,
    );
    let table_transform = transform(|t| {
        t.translate(-50.0, 50.0, 0.0).rotate_z(30.0);
    });
    SceneNode::add_chain(&camera, vec![wood, Rc::clone(&table_transform), table])?;

    let teapot_material = material(
        Color::gray(0.19225),
        Color::gray(0.50754),
        Color::gray(0.508273),
        51.2,
    );
    let teapot_transform = transform(|t| {
        t.translate(0.0, 0.0, 26.0).scale(2.5, 2.5, 2.5);
    });
    add_sub_tree(
        &table_transform,
        teapot_material,
        teapot_transform,
        SceneNode::new_geometry(Shape::new("teapot")),
    )?;

    let box_position = transform(|t| {
        t.translate(80.0, 80.0, 7.5);
    });
    SceneNode::add_child(&camera, Rc::clone(&box_position))?;
    let box_material = material(
        Color::rgb(0.25, 0.125, 0.125),
        Color::rgb(0.5, 0.25, 0.25),
        Color::gray(0.25),
        32.0,
    );
    let box_transform = transform(|t| {
        t.rotate_z(45.0).scale(20.0, 20.0, 15.0);
    });
    add_sub_tree(&box_position, box_material, box_transform, unit_box)?;
    let cone_material = material(
        Color::rgb(0.25, 0.2, 0.05),
        Color::rgb(0.75164, 0.60648, 0.22648),
        Color::gray(0.75),
        96.0,
    );
    let cone_transform = transform(|t| {
        t.translate(0.0, 0.0, 15.0).scale(8.0, 8.0, 15.0);
    });
    add_sub_tree(&box_position, cone_material, cone_transform, cone)?;

    let vase = group("Vase");
    add_sub_tree(
        &vase,
        material(
            Color::rgb(0.35, 0.15, 0.25),
            Color::rgb(0.95, 0.35, 0.65),
            Color::gray(0.4),
            16.0,
        ),
        transform(|t| {
            t.translate(0.0, 75.0, 10.0).scale(10.0, 10.0, 20.0);
        }),
        SceneNode::new_geometry(Shape::new("vase")),
    )?;
    SceneNode::add_child(&camera, vase)?;

    let sphere = group("Shiny sphere");
    add_sub_tree(
        &sphere,
        material(
            Color::rgb(0.05, 0.05, 0.2),
            Color::rgb(0.2, 0.2, 0.7),
            Color::white(),
            85.0,
        ),
        transform(|t| {
            t.translate(80.0, 20.0, 10.0).scale(10.0, 10.0, 10.0);
        }),
        SceneNode::new_geometry(Shape::new("sphere")),
    )?;
    SceneNode::add_child(&camera, sphere)?;

    Scene::new(root, camera, max_lights)
}
