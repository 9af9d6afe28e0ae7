use criterion::{criterion_group, criterion_main, Criterion, black_box};

use tkscene::scene::attributes::{
    AttributeData, ATTACHMENT, BATCHCOUNT, BATCHSTART, MATERIAL, VERTREND, VERTRSTART,
};
use tkscene::scene::{MeshStreams, SceneGraph, SceneNode, SceneNodeId};

use glam::Vec4;

fn mesh_streams() -> MeshStreams {
    MeshStreams {
        vertices: Some(vec![Vec4::ZERO, Vec4::X, Vec4::Y]),
        indexes: Some(vec![0, 1, 2]),
        ..Default::default()
    }
}

fn mesh_data(i: usize) -> AttributeData {
    AttributeData::new()
        .with(BATCHSTART, (i * 3) as i64)
        .with(BATCHCOUNT, 3)
        .with(VERTRSTART, (i * 3) as i64)
        .with(VERTREND, (i * 3 + 2) as i64)
        .with(MATERIAL, "BENCH.MATERIAL.MBIN")
        .with(ATTACHMENT, "")
}

/// Model root with `count` meshes directly beneath it.
fn wide_scene(count: usize) -> (SceneGraph, SceneNodeId) {
    let mut graph = SceneGraph::new();
    let root = graph.insert(SceneNode::model("Root"));
    for i in 0..count {
        let mesh = graph.insert(SceneNode::mesh(format!("Mesh{i}"), mesh_streams()));
        graph.attach_child(root, mesh).expect("attach");
        graph.create_attributes_from(mesh, Some(&mesh_data(i))).expect("attributes");
    }
    (graph, root)
}

/// Model root over a single chain of locators, each holding one mesh.
fn deep_scene(depth: usize) -> (SceneGraph, SceneNodeId) {
    let mut graph = SceneGraph::new();
    let root = graph.insert(SceneNode::model("Root"));
    let mut tip = root;
    for i in 0..depth {
        let locator = graph.insert(SceneNode::locator(format!("L{i}")));
        let mesh = graph.insert(SceneNode::mesh(format!("M{i}"), mesh_streams()));
        graph.attach_child(tip, locator).expect("attach");
        graph.attach_child(locator, mesh).expect("attach");
        graph.create_attributes_from(mesh, Some(&mesh_data(i))).expect("attributes");
        tip = locator;
    }
    (graph, root)
}

fn bench_assemble_wide_1000(c: &mut Criterion) {
    c.bench_function("assemble_wide_1000", |b| {
        b.iter(|| wide_scene(black_box(1000)));
    });
}

fn bench_build_wide_1000(c: &mut Criterion) {
    let (mut graph, root) = wide_scene(1000);

    c.bench_function("build_wide_1000", |b| {
        b.iter(|| graph.build(black_box(root)).expect("build"));
    });
}

fn bench_build_deep_64(c: &mut Criterion) {
    let (mut graph, root) = deep_scene(64);

    c.bench_function("build_deep_64", |b| {
        b.iter(|| graph.build(black_box(root)).expect("build"));
    });
}

criterion_group!(
    benches,
    bench_assemble_wide_1000,
    bench_build_wide_1000,
    bench_build_deep_64,
);
criterion_main!(benches);
