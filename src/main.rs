use clap::Parser;
use glam::DVec2;
use log::info;

use ricochet::components::Body;
use ricochet::scene::demo::load_demo_scene;
use ricochet::scene::Scene;
use ricochet::systems::{collision_system, physics_step};

#[derive(Parser)]
#[command(name = "ricochet", about = "Headless 2D rigid-body physics demo")]
struct Args {
    /// Number of fixed simulation steps to run
    #[arg(long, default_value_t = 600)]
    steps: u32,
    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut scene = Scene::new();
    load_demo_scene(&mut scene);

    for step in 0..args.steps {
        physics_step(&mut scene, args.dt);
        collision_system(&mut scene);
        if step % 60 == 0 {
            let (momentum, kinetic) = totals(&scene);
            info!("step {step}: momentum {momentum:?}, kinetic {kinetic:.4}");
        }
    }

    let (momentum, kinetic) = totals(&scene);
    info!("final momentum {momentum:?}, kinetic {kinetic:.4}");
    for entity in scene.view::<&Body>() {
        let body = scene.get::<Body>(entity);
        info!(
            "{entity:?}: pos {:?}, vel {:?}, w {:.3}",
            body.position, body.velocity, body.angular_velocity
        );
    }
}

fn totals(scene: &Scene) -> (DVec2, f64) {
    let mut momentum = DVec2::ZERO;
    let mut kinetic = 0.0;
    for entity in scene.view::<&Body>() {
        let body = scene.get::<Body>(entity);
        momentum += body.mass * body.velocity;
        kinetic += 0.5 * body.mass * body.velocity.length_squared()
            + 0.5 * body.moment_of_inertia * body.angular_velocity * body.angular_velocity;
    }
    (momentum, kinetic)
}
