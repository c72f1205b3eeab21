//! Falling body — a minimal physics loop driving the registry API.
//!
//! One rigid body starts 40 units up and accelerates under gravity until it
//! passes the floor. Each step reads through a view snapshot and writes back
//! through `patch_component`, then prints the body's position.

use glam::Vec3;
use ormr::{EcsError, Entity, Registry};

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
const TIMESTEP: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy)]
struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
}

#[derive(Debug, Clone, Copy)]
struct Rigidbody {
    velocity: Vec3,
    mass: f32,
}

fn simulate(registry: &mut Registry, delta_time: f32) -> Result<(), EcsError> {
    // The view borrows the registry, so collect what the step needs and drop
    // it before mutating.
    let accelerations: Vec<(Entity, Vec3)> = registry
        .create_view::<(Transform, Rigidbody)>()
        .iter()
        .map(|(entity, (_, body))| (*entity, GRAVITY / body.mass))
        .collect();

    for (entity, acceleration) in accelerations {
        let body = registry.get_component_mut::<Rigidbody>(entity)?;
        body.velocity += acceleration * delta_time;
        let velocity = body.velocity;

        registry.patch_component(entity, |transform: &mut Transform| {
            transform.position += velocity * delta_time;
        })?;
    }

    Ok(())
}

fn print_positions(registry: &Registry) {
    for (_, (transform, _)) in &registry.create_view::<(Transform, Rigidbody)>() {
        let p = transform.position;
        println!("{}, {}, {}", p.x, p.y, p.z);
    }
}

fn main() -> Result<(), EcsError> {
    env_logger::init();

    let mut registry = Registry::new();

    let body = registry.create_entity();
    registry.add_component(
        body,
        Transform {
            position: Vec3::new(0.0, 40.0, 0.0),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        },
    )?;
    registry.add_component(
        body,
        Rigidbody {
            velocity: Vec3::ZERO,
            mass: 1.0,
        },
    )?;

    log::info!("dropping body {body} from y = 40");

    loop {
        simulate(&mut registry, TIMESTEP)?;
        print_positions(&registry);

        if registry.get_component::<Transform>(body)?.position.y <= 0.0 {
            break;
        }
    }

    registry.remove_component::<Transform>(body)?;
    registry.remove_component::<Rigidbody>(body)?;
    registry.destroy_entity(body)?;

    log::info!("body reached the floor; registry left empty");
    Ok(())
}
