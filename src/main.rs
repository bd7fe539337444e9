use ahash::AHashMap;
use clap::Parser;
use glam::{Vec2, Vec3, Vec4};
use tracing::{error, info};

mod recipe;
mod scene;

use recipe::animation::{Clip, ClipPlayer};
use recipe::controller::{ControllerConfig, TapToAdvance};
use recipe::steps::StepList;
use scene::camera::Camera;
use scene::camera::Projection;
use scene::graph::{Node, SceneGraph};
use scene::material::{Material, MaterialStore};
use scene::transform::Transform;

#[derive(clap::Parser)]
struct Opts {
    /// Animation frame rate used to convert step frames to seconds.
    #[arg(long, default_value_t = 30.0)]
    frame_rate: f32,

    /// Simulated update rate of the host render loop.
    #[arg(long, default_value_t = 60.0)]
    ticks_per_second: f32,
}

fn main() {
    tracing_subscriber::fmt().init();

    let opts = Opts::parse();

    let steps = StepList::iced_coffee();
    let (graph, materials, taps) = build_kitchen_scene(&steps);

    let mut player = ClipPlayer::new();
    player.insert("Layer0", Clip::new(12.0));

    let config = ControllerConfig {
        frame_rate: opts.frame_rate,
        ..Default::default()
    };

    let mut controller = match TapToAdvance::new(
        graph,
        materials,
        Box::new(player),
        None,
        steps.clone(),
        config,
    ) {
        Ok(controller) => controller,
        Err(err) => {
            error!("Could not start the tap controller: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "Mesh index covers {} name(s)",
        controller.mesh_index().len()
    );

    let delta_time = 1.0 / opts.ticks_per_second.max(1.0);

    // A tap into empty space is rejected without touching the sequence.
    controller.handle_tap(Vec2::new(0.02, 0.98));

    // Tapping a later step's mesh while step 1 is active is also rejected.
    controller.handle_tap(taps["mug"]);

    for step in steps.iter() {
        // Let the glow pulse for a moment before the "user" finds the mesh.
        for _ in 0..30 {
            controller.update(delta_time);
        }
        log_glow(&controller);

        let mesh = &step.mesh_names[0];
        controller.handle_tap(taps[mesh.as_str()]);

        while controller.sequencer().is_playing() {
            controller.update(delta_time);
        }
        controller.update(delta_time);
    }

    info!(
        completed = controller.sequencer().is_completed(),
        "Session finished"
    );
}

fn log_glow(controller: &TapToAdvance) {
    let mut glowing = Vec::new();
    for node_id in controller.highlights().nodes() {
        let Some(node) = controller.graph().node(node_id) else {
            continue;
        };
        let color = node
            .visual
            .as_ref()
            .and_then(|visual| controller.materials().get(visual.material))
            .and_then(Material::displayed_color);
        if let Some(color) = color {
            glowing.push(format!("{} {color:.2}", node.name));
        }
    }
    info!("Glowing: [{}]", glowing.join(", "));
}

/// A stand-in for the lens scene: a camera node plus one prop per recipe
/// mesh, spread over a wall in front of the camera. Also returns the
/// normalized screen position of each prop so the script can tap them.
fn build_kitchen_scene(steps: &StepList) -> (SceneGraph, MaterialStore, AHashMap<String, Vec2>) {
    let mut graph = SceneGraph::new("Root");
    let mut materials = MaterialStore::default();
    let root = graph.root();

    let camera_node = graph.insert_child(
        root,
        Node::new("Camera Object")
            .with_projection(Projection::default())
            .with_transform(Transform::from_translation(Vec3::new(0.0, -120.0, 30.0))),
    );

    let props: &[(&str, Vec3, Vec4)] = &[
        ("Nescafe_TOP__Copy_", Vec3::new(-28.0, 0.0, 50.0), Vec4::new(0.8, 0.2, 0.2, 1.0)),
        ("Nescafe_BTM", Vec3::new(0.0, 0.0, 50.0), Vec4::new(0.7, 0.3, 0.2, 1.0)),
        ("pot", Vec3::new(28.0, 0.0, 50.0), Vec4::new(0.6, 0.6, 0.6, 1.0)),
        ("tablespoon", Vec3::new(-28.0, 0.0, 30.0), Vec4::new(0.8, 0.8, 0.8, 1.0)),
        ("jug", Vec3::new(0.0, 0.0, 30.0), Vec4::new(0.9, 0.9, 0.8, 1.0)),
        ("mixing_bowl", Vec3::new(28.0, 0.0, 30.0), Vec4::new(0.3, 0.5, 0.8, 1.0)),
        ("scoop", Vec3::new(-28.0, 0.0, 10.0), Vec4::new(0.5, 0.4, 0.3, 1.0)),
        ("ice_bowl", Vec3::new(0.0, 0.0, 10.0), Vec4::new(0.7, 0.9, 1.0, 1.0)),
        ("mug", Vec3::new(28.0, 0.0, 10.0), Vec4::new(0.9, 0.5, 0.1, 1.0)),
    ];

    for (mesh_name, position, color) in props {
        let material = materials.insert(Material::with_base_color(*color));
        graph.insert_child(
            root,
            Node::new(*mesh_name)
                .with_visual(*mesh_name, material)
                .with_transform(Transform::from_translation(*position)),
        );
    }

    let camera = graph
        .node(camera_node)
        .and_then(Camera::from_node)
        .expect("camera node was just created");

    let mut taps = AHashMap::new();
    for step in steps.iter() {
        for mesh_name in &step.mesh_names {
            if let Some((_, position, _)) = props.iter().find(|(name, ..)| name == mesh_name) {
                if let Some(screen) = camera.world_space_to_screen_space(*position) {
                    taps.insert(mesh_name.clone(), screen);
                }
            }
        }
    }

    (graph, materials, taps)
}
