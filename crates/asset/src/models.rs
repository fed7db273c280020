//! Built-in furniture models assembled from boxes.
//!
//! Units are chosen for the room layout: chairs and the table stand on the
//! same floor once scaled by 2, and the cube rests on the table top.

use crate::mesh::MeshData;

/// Cube of edge `side`, centered at the origin.
pub fn cube(side: f32) -> MeshData {
    let h = side * 0.5;
    let mut mesh = MeshData::default();
    mesh.push_box([-h, -h, -h], [h, h, h]);
    mesh
}

/// Chair standing on y = 0, backrest on the -z side.
pub fn chair() -> MeshData {
    const SEAT_Y: f32 = 0.45;
    const SEAT_T: f32 = 0.05;
    const HALF: f32 = 0.25;
    const LEG: f32 = 0.04;

    let mut mesh = MeshData::default();
    mesh.push_box([-HALF, SEAT_Y, -HALF], [HALF, SEAT_Y + SEAT_T, HALF]);
    for (x, z) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let cx = x * (HALF - LEG);
        let cz = z * (HALF - LEG);
        mesh.push_box([cx - LEG, 0.0, cz - LEG], [cx + LEG, SEAT_Y, cz + LEG]);
    }
    mesh.push_box(
        [-HALF, SEAT_Y + SEAT_T, -HALF],
        [HALF, SEAT_Y + SEAT_T + 0.5, -HALF + SEAT_T],
    );
    log::debug!(
        "Built chair: {} vertices, {} indices",
        mesh.vertices.len(),
        mesh.indices.len()
    );
    mesh
}

/// Square table, legs from y = -0.5 up to a top at y = 0.3.
pub fn table() -> MeshData {
    const TOP_Y: f32 = 0.3;
    const TOP_T: f32 = 0.05;
    const HALF: f32 = 0.5;
    const LEG: f32 = 0.05;

    let mut mesh = MeshData::default();
    mesh.push_box([-HALF, TOP_Y - TOP_T, -HALF], [HALF, TOP_Y, HALF]);
    for (x, z) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let cx = x * (HALF - 2.0 * LEG);
        let cz = z * (HALF - 2.0 * LEG);
        mesh.push_box([cx - LEG, -0.5, cz - LEG], [cx + LEG, TOP_Y - TOP_T, cz + LEG]);
    }
    log::debug!(
        "Built table: {} vertices, {} indices",
        mesh.vertices.len(),
        mesh.indices.len()
    );
    mesh
}
