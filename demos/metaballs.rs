use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, PrimitiveTopology},
    prelude::*,
};
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use marching_cubes::{Axis, AxisResolution, GeneratedMesh, Grid, MarchingCubes, Point, Value};

const RESOLUTION: usize = 50;
const EXTENT: Value = 2.0;
const THRESHOLD: Value = 4.0;

/// Rest position and weight of each potential. At `t = 0` the scene is these
/// four blobs exactly.
const BLOBS: [([Value; 3], Value); 4] = [
    ([0.5, 0.0, 0.0], 1.0),
    ([-0.5, 0.0, 0.0], 1.0 / 2.0),
    ([0.0, -0.8, 0.0], 1.0 / 2.0),
    ([0.0, 0.4, 0.6], 1.0 / 3.0),
];

/// Four weighted inverse-square potentials, `weight / |p - center|²`.
#[derive(Resource)]
struct Blobs {
    centers: [(Point, Value); 4],
}

impl Blobs {
    /// Each blob drifts around its rest position; every offset vanishes at `t = 0`.
    fn at_time(t: f32) -> Self {
        let drift = |phase: f32| 0.25 * (t + phase).sin() - 0.25 * phase.sin();
        Self {
            centers: std::array::from_fn(|n| {
                let ([x, y, z], weight) = BLOBS[n];
                let phase = n as f32;
                (
                    Point::new(x + drift(phase), y + drift(2.0 * phase), z + drift(0.5 * phase)),
                    weight,
                )
            }),
        }
    }

    fn field(&self, p: Point) -> Value {
        self.centers
            .iter()
            .map(|(center, weight)| weight / (p - center).norm_squared().max(Value::EPSILON))
            .sum()
    }
}

#[derive(Component)]
struct BlobSurface;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, PanOrbitCameraPlugin))
        .insert_resource(Blobs::at_time(0.0))
        .add_systems(Startup, setup)
        .add_systems(Update, (move_blobs, remesh).chain())
        .run();
}

fn grid() -> Result<Grid, marching_cubes::MarchingCubesError> {
    let axis = |axis| AxisResolution::new(axis, RESOLUTION, -EXTENT, EXTENT);
    Ok(Grid::new(axis(Axis::X)?, axis(Axis::Y)?, axis(Axis::Z)?))
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    bevy::log::info!("Metaballs Example");

    commands.spawn((
        Camera3d::default(),
        PanOrbitCamera::default(),
        Transform::from_xyz(0.0, 2.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::FULL_DAYLIGHT,
            ..Default::default()
        },
        Transform::default().with_rotation(Quat::from_rotation_x(-45.0_f32.to_radians())),
    ));

    commands.spawn((
        BlobSurface,
        Mesh3d(meshes.add(to_bevy_mesh(GeneratedMesh::new_empty()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.5, 1.0),
            ..Default::default()
        })),
    ));
}

fn move_blobs(time: Res<Time>, mut blobs: ResMut<Blobs>) {
    *blobs = Blobs::at_time(time.elapsed_secs());
}

/// Rebuilds the surface from the current blob positions every frame.
fn remesh(
    blobs: Res<Blobs>,
    surfaces: Query<&Mesh3d, With<BlobSurface>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let generated = grid().and_then(|grid| {
        MarchingCubes::new(|p: Point| blobs.field(p), grid)
            .with_threshold(THRESHOLD)?
            .generate()
    });
    let generated = match generated {
        Ok(generated) => generated,
        Err(err) => {
            bevy::log::error!("failed to mesh blobs: {err}");
            return;
        }
    };

    for handle in surfaces.iter() {
        if let Some(mut mesh) = meshes.get_mut(&handle.0) {
            *mesh = to_bevy_mesh(generated.clone());
        }
    }
}

/// Moves a [`GeneratedMesh`] into a triangle-list Bevy [`Mesh`].
fn to_bevy_mesh(generated: GeneratedMesh) -> Mesh {
    let mut bevy_mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );

    bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, generated.vertex_buffer());
    bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, generated.normal_buffer());
    bevy_mesh.insert_indices(Indices::U32(generated.indices));
    bevy_mesh
}
