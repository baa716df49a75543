#![deny(clippy::all)]

use clap::{value_t, App, Arg};
use glimmer::{
    Camera, Canvas, Material, Plane, PointLight, Scene, SimpleMaterial, SingularTransformError,
    Sphere, Transform, WindowCanvas,
};
use log::info;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;
use std::time::Instant;

/// Three spheres over a reflective floor plane, lit by a pair of colored
/// point lights.
fn build_demo_scene() -> Result<Scene, SingularTransformError> {
    let mut camera = Camera::default();
    camera.set_position(Point3::new(0.0, -10.0, -1.0));
    camera.set_horz_size(0.25);
    camera.set_aspect_ratio(16.0 / 9.0);
    camera.update_geometry();

    let mut scene = Scene::new(camera);

    let glossy_blue: Arc<dyn Material> = Arc::new(SimpleMaterial::new(
        Vector3::new(0.25, 0.5, 0.8),
        0.5,
        10.0,
    ));
    let glossy_orange: Arc<dyn Material> =
        Arc::new(SimpleMaterial::new(Vector3::new(1.0, 0.5, 0.0), 0.75, 10.0));
    let matte_floor: Arc<dyn Material> =
        Arc::new(SimpleMaterial::new(Vector3::from([0.5; 3]), 0.25, 0.0));

    let mut left_sphere = Sphere::new(
        Vector3::new(0.25, 0.5, 0.8),
        Transform::new(
            Vector3::new(-1.5, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::new(0.5, 0.5, 0.75),
        )?,
    );
    left_sphere.set_material(Arc::clone(&glossy_blue));
    scene.add_object(Arc::new(left_sphere));

    let mut centre_sphere = Sphere::new(
        Vector3::new(1.0, 0.5, 0.0),
        Transform::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Vector3::new(0.75, 0.5, 0.5),
        )?,
    );
    centre_sphere.set_material(Arc::clone(&glossy_orange));
    scene.add_object(Arc::new(centre_sphere));

    // The right sphere keeps its base color and takes the diffuse
    // fallback path.
    scene.add_object(Arc::new(Sphere::new(
        Vector3::new(1.0, 0.8, 0.0),
        Transform::new(
            Vector3::new(1.5, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::new(0.75, 0.75, 0.75),
        )?,
    )));

    let mut floor = Plane::new(
        Vector3::from([0.5; 3]),
        Transform::new(
            Vector3::new(0.0, 0.0, 0.75),
            Vector3::zeros(),
            Vector3::new(4.0, 4.0, 1.0),
        )?,
    );
    floor.set_material(Arc::clone(&matte_floor));
    scene.add_object(Arc::new(floor));

    scene.add_light(Arc::new(PointLight::new(
        Vector3::new(0.0, 0.0, 1.0),
        Point3::new(5.0, -10.0, -5.0),
        1.0,
    )));
    scene.add_light(Arc::new(PointLight::new(
        Vector3::new(1.0, 0.0, 0.0),
        Point3::new(-5.0, -10.0, -5.0),
        1.0,
    )));
    scene.add_light(Arc::new(PointLight::new(
        Vector3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, -10.0, -5.0),
        1.0,
    )));

    Ok(scene)
}

fn main() {
    env_logger::init();

    let matches = App::new("glimmer")
        .about("A small recursive ray tracer")
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help(
                    "Output rendered image to file\n\
                     If omitted, image is rendered to a window",
                ),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .default_value("1280")
                .help("Output image width in pixels"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .default_value("720")
                .help("Output image height in pixels"),
        )
        .arg(
            Arg::with_name("noprogress")
                .long("no-progress")
                .help("Hide progress bar"),
        )
        .get_matches();

    let width = value_t!(matches, "width", u32).unwrap_or_else(|e| e.exit());
    let height = value_t!(matches, "height", u32).unwrap_or_else(|e| e.exit());
    let output_filename = matches.value_of("output");
    let use_progress = !matches.is_present("noprogress");

    let scene = build_demo_scene().expect("demo scene transforms are invertible");
    info!(
        "scene holds {} objects and {} lights",
        scene.objects().len(),
        scene.lights().len()
    );

    if let Some(filename) = output_filename {
        let now = Instant::now();
        let image = scene.render_to_image(width, height, use_progress);
        image.save(filename).expect("unable to write image");
        println!("Output written to {} in {:.3?}", filename, now.elapsed());
    } else {
        let mut canvas = WindowCanvas::new(width, height);
        let now = Instant::now();
        scene.render(&mut canvas);
        println!("Rendered in {:.3?}", now.elapsed());
        canvas.present();
    }
}
