//! Scene node

use std::{
    cell::RefCell,
    collections::HashSet,
    fmt, io,
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
};

use lazy_static::lazy_static;
use thiserror::Error;

use super::{
    CameraNode, Geometry, LightNode, PresentationNode, ProjectionError, SceneState, ShaderError,
    ShaderNode, TransformNode,
};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Adding {child} under {parent} would make a node its own ancestor")]
    Cycle { parent: String, child: String },
    #[error("Node {0} is not a camera")]
    NotACamera(String),
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),
    #[error("Geometry {name} failed to draw: {reason}")]
    Geometry { name: String, reason: String },
}

pub type NodeRef = Rc<RefCell<SceneNode>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Base,
    Transform,
    Presentation,
    Light,
    Camera,
    Geometry,
    Shader,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Base => "NodeKind::BASE",
            NodeKind::Transform => "NodeKind::TRANSFORM",
            NodeKind::Presentation => "NodeKind::PRESENTATION",
            NodeKind::Light => "NodeKind::LIGHT",
            NodeKind::Camera => "NodeKind::CAMERA",
            NodeKind::Geometry => "NodeKind::GEOMETRY",
            NodeKind::Shader => "NodeKind::SHADER",
        };
        f.write_str(s)
    }
}

pub enum NodeData {
    Base,
    Transform(TransformNode),
    Presentation(PresentationNode),
    Light(LightNode),
    Camera(CameraNode),
    Geometry(Rc<dyn Geometry>),
    Shader(ShaderNode),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Base => NodeKind::Base,
            NodeData::Transform(_) => NodeKind::Transform,
            NodeData::Presentation(_) => NodeKind::Presentation,
            NodeData::Light(_) => NodeKind::Light,
            NodeData::Camera(_) => NodeKind::Camera,
            NodeData::Geometry(_) => NodeKind::Geometry,
            NodeData::Shader(_) => NodeKind::Shader,
        }
    }
}

impl fmt::Debug for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Geometry(g) => write!(f, "Geometry({})", g.name()),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Graph node. Owns its children in draw order; a child may be shared by
/// several parents but never becomes its own ancestor.
#[derive(Debug)]
pub struct SceneNode {
    pub(crate) uid: usize,
    pub(crate) name: Option<String>,
    pub(crate) children: Vec<NodeRef>,
    pub(crate) data: NodeData,
}

lazy_static! {
    static ref NEXT_UID: AtomicUsize = AtomicUsize::new(0);
}

impl SceneNode {
    fn gen_uid() -> usize {
        NEXT_UID.fetch_add(1, Ordering::SeqCst)
    }

    fn with_data(data: NodeData) -> NodeRef {
        Rc::new(RefCell::new(SceneNode {
            uid: Self::gen_uid(),
            name: None,
            children: vec![],
            data,
        }))
    }

    pub fn new_empty() -> NodeRef {
        Self::with_data(NodeData::Base)
    }

    pub fn new_transform(transform: TransformNode) -> NodeRef {
        Self::with_data(NodeData::Transform(transform))
    }

    pub fn new_presentation(presentation: PresentationNode) -> NodeRef {
        Self::with_data(NodeData::Presentation(presentation))
    }

    pub fn new_light(light: LightNode) -> NodeRef {
        Self::with_data(NodeData::Light(light))
    }

    pub fn new_camera(camera: CameraNode) -> NodeRef {
        Self::with_data(NodeData::Camera(camera))
    }

    pub fn new_geometry(geometry: Rc<dyn Geometry>) -> NodeRef {
        Self::with_data(NodeData::Geometry(geometry))
    }

    pub fn new_shader(shader: ShaderNode) -> NodeRef {
        Self::with_data(NodeData::Shader(shader))
    }

    pub fn uid(&self) -> usize {
        self.uid
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = Some(name.into());
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn node_kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn as_camera(&self) -> Option<&CameraNode> {
        match &self.data {
            NodeData::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut CameraNode> {
        match &mut self.data {
            NodeData::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_transform_mut(&mut self) -> Option<&mut TransformNode> {
        match &mut self.data {
            NodeData::Transform(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn as_presentation_mut(&mut self) -> Option<&mut PresentationNode> {
        match &mut self.data {
            NodeData::Presentation(presentation) => Some(presentation),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut LightNode> {
        match &mut self.data {
            NodeData::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_shader_mut(&mut self) -> Option<&mut ShaderNode> {
        match &mut self.data {
            NodeData::Shader(shader) => Some(shader),
            _ => None,
        }
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} #{}", self.node_kind(), self.uid),
        }
    }

    /// Appends `child` to `parent`'s children. Fails if `parent` is reachable
    /// from `child`, including the case where both are the same node.
    pub fn add_child(parent: &NodeRef, child: NodeRef) -> Result<(), SceneError> {
        let target = parent.borrow().uid;
        let mut visited = HashSet::new();
        let mut pending = vec![Rc::clone(&child)];
        while let Some(node) = pending.pop() {
            let node = node.borrow();
            if node.uid == target {
                return Err(SceneError::Cycle {
                    parent: parent.borrow().label(),
                    child: child.borrow().label(),
                });
            }
            if visited.insert(node.uid) {
                pending.extend(node.children.iter().cloned());
            }
        }
        parent.borrow_mut().children.push(child);
        Ok(())
    }

    /// Links `nodes` so each one becomes the child of the one before it.
    /// Returns the last node of the chain.
    pub fn add_chain<I>(parent: &NodeRef, nodes: I) -> Result<NodeRef, SceneError>
    where
        I: IntoIterator<Item = NodeRef>,
    {
        let mut tail = Rc::clone(parent);
        for node in nodes {
            Self::add_child(&tail, Rc::clone(&node))?;
            tail = node;
        }
        Ok(tail)
    }

    /// Draws this node and its subtree. Transform nodes restore the model
    /// matrix on the way out; presentation, light and shader nodes leave
    /// their bindings in place for later siblings.
    pub fn draw(&self, state: &mut SceneState) -> Result<(), SceneError> {
        match &self.data {
            NodeData::Base => self.draw_children(state),
            NodeData::Transform(transform) => {
                let mut scope = state.push_transform(transform.matrix());
                self.draw_children(&mut scope)
            }
            NodeData::Presentation(presentation) => {
                presentation.apply(state);
                self.draw_children(state)
            }
            NodeData::Light(light) => {
                light.apply(state);
                self.draw_children(state)
            }
            NodeData::Camera(camera) => {
                camera.apply_to_state(state);
                self.draw_children(state)
            }
            NodeData::Shader(shader) => {
                shader.apply(state);
                self.draw_children(state)
            }
            NodeData::Geometry(geometry) => {
                geometry.draw(state)?;
                self.draw_children(state)
            }
        }
    }

    pub fn draw_children(&self, state: &mut SceneState) -> Result<(), SceneError> {
        for child in self.children.iter() {
            child.borrow().draw(state)?;
        }
        Ok(())
    }

    /// Per-frame update pass. Walks the tree in draw order with transforms
    /// scoped the same way, giving geometry a chance to refresh itself.
    pub fn update(&self, state: &mut SceneState) -> Result<(), SceneError> {
        match &self.data {
            NodeData::Transform(transform) => {
                let mut scope = state.push_transform(transform.matrix());
                self.update_children(&mut scope)
            }
            NodeData::Geometry(geometry) => {
                geometry.update(state)?;
                self.update_children(state)
            }
            _ => self.update_children(state),
        }
    }

    fn update_children(&self, state: &mut SceneState) -> Result<(), SceneError> {
        for child in self.children.iter() {
            child.borrow().update(state)?;
        }
        Ok(())
    }

    /// Detaches every child. Shared children survive as long as another
    /// parent still holds them.
    pub fn destroy(&mut self) {
        log::debug!("Destroy {} with {} children", self.label(), self.children.len());
        self.children.clear();
    }

    /// Writes an indented outline of the subtree, one `- ` per level.
    pub fn print_graph<W: io::Write>(&self, out: &mut W, level: usize) -> io::Result<()> {
        let indent = "- ".repeat(level);
        match &self.name {
            Some(name) => writeln!(out, "{}{} - [{}]", indent, name, self.node_kind())?,
            None => writeln!(out, "{}[{}]", indent, self.node_kind())?,
        }
        for child in self.children.iter() {
            child.borrow().print_graph(out, level + 1)?;
        }
        Ok(())
    }
}

impl PartialEq for SceneNode {
    fn eq(&self, other: &SceneNode) -> bool {
        self.uid == other.uid
    }
}
