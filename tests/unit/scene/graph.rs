use super::*;
use crate::{
    drawables::shape::Shape,
    foundation::core::{Point, Rgba8},
    render::recording::RecordingSurface,
};

fn square() -> Shape {
    Shape::rectangle(10.0, 10.0, Point::ZERO)
        .unwrap()
        .with_fill(Rgba8::WHITE)
}

fn object(scene: &mut Scene, name: &str) -> NodeId {
    scene.create_object(name, square()).unwrap()
}

fn origin_of(cmd: &crate::render::recording::DrawCommand) -> Point {
    cmd.state.transform * Point::ZERO
}

#[test]
fn root_is_a_group_called_scene() {
    let scene = Scene::new();
    assert_eq!(scene.name(scene.root()).unwrap(), "scene");
    assert!(matches!(scene.node(scene.root()).unwrap().kind(), NodeKind::Group));
    assert!(scene.is_empty());
}

#[test]
fn add_and_lookup_by_name_and_path() {
    let mut scene = Scene::new();
    let world = scene.create_group("world").unwrap();
    let player = object(&mut scene, "player");
    scene.add(scene.root(), world).unwrap();
    scene.add(world, player).unwrap();

    assert_eq!(scene.child(world, "player").unwrap(), player);
    assert_eq!(scene.find_path(&["world", "player"]).unwrap(), player);
    assert_eq!(scene.parent(player).unwrap(), Some(world));
    assert!(scene.is_attached(player));
    assert!(matches!(
        scene.find_path(&["world", "ghost"]),
        Err(TableauError::NotFound(_))
    ));
}

#[test]
fn empty_names_are_rejected() {
    let mut scene = Scene::new();
    assert!(matches!(
        scene.create_group(""),
        Err(TableauError::InvalidParameter(_))
    ));
}

#[test]
fn duplicate_name_leaves_both_parents_unchanged() {
    let mut scene = Scene::new();
    let a = scene.create_group("a").unwrap();
    let b = scene.create_group("b").unwrap();
    let first = object(&mut scene, "x");
    let second = object(&mut scene, "x");
    scene.add(a, first).unwrap();
    scene.add(b, second).unwrap();

    let err = scene.add(a, second).unwrap_err();
    assert!(matches!(err, TableauError::DuplicateName(_)));
    assert_eq!(scene.children(a).unwrap(), &[first]);
    assert_eq!(scene.children(b).unwrap(), &[second]);
    assert_eq!(scene.parent(second).unwrap(), Some(b));
}

#[test]
fn cycles_are_rejected() {
    let mut scene = Scene::new();
    let a = scene.create_group("a").unwrap();
    let b = scene.create_group("b").unwrap();
    let c = scene.create_group("c").unwrap();
    scene.add(a, b).unwrap();
    scene.add(b, c).unwrap();

    assert!(matches!(scene.add(a, a), Err(TableauError::Cycle(_))));
    assert!(matches!(scene.add(c, a), Err(TableauError::Cycle(_))));
    assert_eq!(scene.parent(a).unwrap(), None);
    assert_eq!(scene.children(c).unwrap(), &[] as &[NodeId]);
}

#[test]
fn root_cannot_be_parented_or_destroyed() {
    let mut scene = Scene::new();
    let g = scene.create_group("g").unwrap();
    let root = scene.root();
    assert!(matches!(
        scene.add(g, root),
        Err(TableauError::InvalidParameter(_))
    ));
    assert!(matches!(
        scene.destroy(root),
        Err(TableauError::InvalidParameter(_))
    ));
}

#[test]
fn reparent_detaches_once_and_keeps_animations() {
    let mut scene = Scene::new();
    let a = scene.create_group("a").unwrap();
    let b = scene.create_group("b").unwrap();
    let obj = object(&mut scene, "obj");
    scene.add(a, obj).unwrap();
    scene
        .animate(obj, AnimTarget::Opacity(0.0), 100.0, Repeat::Times(1))
        .unwrap();

    scene.add(a, obj).unwrap();
    assert_eq!(scene.children(a).unwrap(), &[obj]);

    scene.add(b, obj).unwrap();
    assert!(scene.children(a).unwrap().is_empty());
    assert_eq!(scene.children(b).unwrap(), &[obj]);
    assert_eq!(scene.object(obj).unwrap().animations().len(), 1);
}

#[test]
fn remove_requires_a_direct_child_and_cancels_the_subtree() {
    let mut scene = Scene::new();
    let group = scene.create_group("group").unwrap();
    let parent = object(&mut scene, "parent");
    let kid = object(&mut scene, "kid");
    scene.add(scene.root(), group).unwrap();
    scene.add(group, parent).unwrap();
    scene.add(parent, kid).unwrap();
    scene
        .animate(parent, AnimTarget::Scale(2.0), 100.0, Repeat::Times(1))
        .unwrap();
    scene
        .animate(kid, AnimTarget::Rotate(90.0), 100.0, Repeat::Forever)
        .unwrap();

    assert!(matches!(
        scene.remove(scene.root(), parent),
        Err(TableauError::NotFound(_))
    ));

    scene.remove(group, parent).unwrap();
    assert_eq!(scene.parent(parent).unwrap(), None);
    assert!(scene.object(parent).unwrap().animations().is_empty());
    assert!(scene.object(kid).unwrap().animations().is_empty());
    assert_eq!(scene.parent(kid).unwrap(), Some(parent));
}

#[test]
fn destroy_frees_the_subtree() {
    let mut scene = Scene::new();
    let g = scene.create_group("g").unwrap();
    let a = object(&mut scene, "a");
    let b = object(&mut scene, "b");
    scene.add(scene.root(), g).unwrap();
    scene.add(g, a).unwrap();
    scene.add(a, b).unwrap();

    assert_eq!(scene.destroy(g).unwrap(), 3);
    assert!(!scene.contains(g));
    assert!(!scene.contains(b));
    assert!(scene.children(scene.root()).unwrap().is_empty());
    assert!(matches!(scene.name(a), Err(TableauError::NotFound(_))));
    assert!(scene.is_empty());
}

#[test]
fn descendants_are_pre_order_in_insertion_order() {
    let mut scene = Scene::new();
    let a = scene.create_group("a").unwrap();
    let a1 = scene.create_group("a1").unwrap();
    let b = scene.create_group("b").unwrap();
    let root = scene.root();
    scene.add(root, a).unwrap();
    scene.add(root, b).unwrap();
    scene.add(a, a1).unwrap();

    let order: Vec<NodeId> = scene.descendants(root).collect();
    assert_eq!(order, vec![root, a, a1, b]);
}

#[test]
fn groups_have_no_transform_or_animations() {
    let mut scene = Scene::new();
    let g = scene.create_group("g").unwrap();
    assert!(matches!(
        scene.transform_mut(g),
        Err(TableauError::InvalidParameter(_))
    ));
    assert!(matches!(
        scene.animate(g, AnimTarget::Opacity(0.0), 10.0, Repeat::Times(1)),
        Err(TableauError::InvalidParameter(_))
    ));
}

#[test]
fn only_attached_objects_advance() {
    let mut scene = Scene::new();
    let on = object(&mut scene, "on");
    let off = object(&mut scene, "off");
    scene.add(scene.root(), on).unwrap();
    let job = scene
        .animate(on, AnimTarget::Opacity(0.0), 100.0, Repeat::Times(1))
        .unwrap();
    scene
        .animate(off, AnimTarget::Opacity(0.0), 100.0, Repeat::Times(1))
        .unwrap();

    let events = scene.advance(100.0);
    assert_eq!(
        events,
        vec![AnimationEvent {
            node: on,
            job,
            kind: TransformKind::Opacity
        }]
    );
    assert_eq!(scene.transform(on).unwrap().opacity, 0.0);
    assert_eq!(scene.transform(off).unwrap().opacity, 1.0);
}

#[test]
fn negative_or_nan_delta_advances_nothing() {
    let mut scene = Scene::new();
    let obj = object(&mut scene, "obj");
    scene.add(scene.root(), obj).unwrap();
    scene
        .animate(obj, AnimTarget::Scale(3.0), 100.0, Repeat::Times(1))
        .unwrap();
    scene.advance(-50.0);
    scene.advance(f64::NAN);
    assert_eq!(scene.transform(obj).unwrap().scale, 1.0);
}

#[test]
fn cancel_api_reports_unknown_jobs() {
    let mut scene = Scene::new();
    let obj = object(&mut scene, "obj");
    let job = scene
        .animate(obj, AnimTarget::Scale(3.0), 100.0, Repeat::Times(1))
        .unwrap();
    scene
        .animate(obj, AnimTarget::Opacity(0.5), 100.0, Repeat::Times(1))
        .unwrap();
    scene.cancel(obj, job).unwrap();
    assert!(matches!(
        scene.cancel(obj, job),
        Err(TableauError::NotFound(_))
    ));
    assert_eq!(scene.cancel_kind(obj, TransformKind::Opacity).unwrap(), 1);
    assert_eq!(scene.clear_animations(obj).unwrap(), 0);
}

#[test]
fn sibling_transforms_do_not_leak() {
    let mut scene = Scene::new();
    let a = object(&mut scene, "a");
    let b = object(&mut scene, "b");
    scene.add(scene.root(), a).unwrap();
    scene.add(scene.root(), b).unwrap();
    scene.transform_mut(a).unwrap().move_to(100.0, 0.0).unwrap();
    scene.transform_mut(a).unwrap().set_opacity(0.5).unwrap();

    let mut surface = RecordingSurface::new();
    assert_eq!(scene.render(&mut surface).unwrap(), 2);
    let cmds = surface.commands();
    assert_eq!(cmds.len(), 2);
    assert_eq!(origin_of(&cmds[0]), Point::new(100.0, 0.0));
    assert_eq!(cmds[0].state.alpha, 0.5);
    assert_eq!(origin_of(&cmds[1]), Point::ZERO);
    assert_eq!(cmds[1].state.alpha, 1.0);
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn children_inherit_parent_state() {
    let mut scene = Scene::new();
    let parent = object(&mut scene, "parent");
    let kid = object(&mut scene, "kid");
    scene.add(scene.root(), parent).unwrap();
    scene.add(parent, kid).unwrap();
    scene.transform_mut(parent).unwrap().move_to(10.0, 20.0).unwrap();
    scene.transform_mut(parent).unwrap().set_opacity(0.5).unwrap();
    scene.transform_mut(kid).unwrap().move_by(1.0, 1.0).unwrap();
    scene.transform_mut(kid).unwrap().set_opacity(0.5).unwrap();
    scene.transform_mut(kid).unwrap().set_filter("blur", 0.3).unwrap();

    let mut surface = RecordingSurface::new();
    scene.render(&mut surface).unwrap();
    let kid_cmd = &surface.commands()[1];
    assert_eq!(origin_of(kid_cmd), Point::new(11.0, 21.0));
    assert_eq!(kid_cmd.state.alpha, 0.25);
    assert_eq!(kid_cmd.state.filters.len(), 1);
    assert!(surface.commands()[0].state.filters.is_empty());
}

#[test]
fn hidden_subtrees_are_skipped_but_keep_animating() {
    let mut scene = Scene::new();
    let g = scene.create_group("g").unwrap();
    let obj = object(&mut scene, "obj");
    scene.add(scene.root(), g).unwrap();
    scene.add(g, obj).unwrap();
    scene.set_visible(g, false).unwrap();
    scene
        .animate(obj, AnimTarget::Opacity(0.0), 100.0, Repeat::Times(1))
        .unwrap();

    scene.advance(50.0);
    let mut surface = RecordingSurface::new();
    assert_eq!(scene.render(&mut surface).unwrap(), 0);
    assert!(surface.commands().is_empty());
    assert_eq!(scene.transform(obj).unwrap().opacity, 0.5);
}

#[test]
fn drawables_can_be_reached_by_type() {
    let mut scene = Scene::new();
    let obj = object(&mut scene, "obj");
    let bounds = scene
        .object(obj)
        .unwrap()
        .drawable_as::<Shape>()
        .unwrap()
        .bounds();
    assert_eq!(bounds, Some(crate::foundation::core::Rect::new(0.0, 0.0, 10.0, 10.0)));

    let circle = Shape::circle(1.0, Point::ZERO).unwrap();
    let old = scene.object_mut(obj).unwrap().set_drawable(circle);
    assert!(old.bounds().is_some());
    assert!(
        scene
            .object_mut(obj)
            .unwrap()
            .drawable_as_mut::<crate::drawables::picture::Picture>()
            .is_none()
    );
}

struct Broken;

impl Renderable for Broken {
    fn render(&self, surface: &mut dyn Surface) -> TableauResult<()> {
        surface.multiply_alpha(0.5);
        Err(TableauError::invalid_parameter("broken drawable"))
    }
}

#[test]
fn failed_draw_still_unwinds_surface_state() {
    let mut scene = Scene::new();
    let layer = scene.create_group("layer").unwrap();
    let broken = scene.create_object("broken", Broken).unwrap();
    let after = object(&mut scene, "after");
    scene.add(scene.root(), layer).unwrap();
    scene.add(layer, broken).unwrap();
    scene.add(scene.root(), after).unwrap();
    scene.transform_mut(broken).unwrap().move_to(40.0, 0.0).unwrap();

    let mut surface = RecordingSurface::new();
    surface.clear().unwrap();
    let err = scene.render(&mut surface).unwrap_err();
    assert!(matches!(err, TableauError::InvalidParameter(_)));
    assert_eq!(surface.save_depth(), 0);

    // Nothing from the failed object lingers on the surface.
    scene.destroy(broken).unwrap();
    assert_eq!(scene.render(&mut surface).unwrap(), 1);
    let cmd = surface.commands().last().unwrap();
    assert_eq!(origin_of(cmd), Point::ZERO);
    assert_eq!(cmd.state.alpha, 1.0);
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn transform_domain_is_enforced_through_the_scene() {
    let mut scene = Scene::new();
    let obj = object(&mut scene, "obj");
    let t = scene.transform_mut(obj).unwrap();
    assert!(t.set_opacity(7.5).is_err());
    assert!(t.set_scale(f64::NAN).is_err());
    t.set_rotation(1080.0).unwrap();

    let t = scene.transform(obj).unwrap();
    assert_eq!(t.opacity(), 1.0);
    assert_eq!(t.scale(), 1.0);
    assert_eq!(t.rotation_deg(), 0.0);
}
