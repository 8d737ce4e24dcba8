//! A ready-made city road network for demos and tests.

use crate::math::Point2d;
use crate::road::RoadAttributes;

/// Road records of the sample city: name, end points, capacity, and
/// nominal speed in km/h.
const ROADS: [(&str, [f64; 4], u32, f64); 17] = [
    // East-west avenues.
    ("Av. Amazonas", [50.0, 150.0, 750.0, 150.0], 20, 50.0),
    ("Av. República", [50.0, 250.0, 750.0, 250.0], 18, 45.0),
    ("Av. 10 de Agosto", [50.0, 350.0, 750.0, 350.0], 22, 55.0),
    ("Av. Patria", [50.0, 450.0, 750.0, 450.0], 20, 48.0),
    // North-south streets.
    ("Calle García Moreno", [150.0, 50.0, 150.0, 550.0], 15, 35.0),
    ("Calle Flores", [250.0, 50.0, 250.0, 550.0], 12, 30.0),
    ("Calle Manuel Larrea", [350.0, 50.0, 350.0, 550.0], 14, 32.0),
    ("Calle Veintimilla", [450.0, 50.0, 450.0, 550.0], 14, 33.0),
    ("Calle Pérez Guerrero", [550.0, 50.0, 550.0, 550.0], 13, 31.0),
    ("Calle Juan Montalvo", [650.0, 50.0, 650.0, 550.0], 12, 30.0),
    // Highways.
    ("Autopista Norte", [100.0, 100.0, 700.0, 100.0], 25, 70.0),
    ("Autopista Sur", [100.0, 500.0, 700.0, 500.0], 25, 70.0),
    // Diagonal connectors.
    ("Av. Eugenio Escobar", [200.0, 180.0, 600.0, 320.0], 16, 40.0),
    ("Av. Naciones Unidas", [100.0, 200.0, 700.0, 200.0], 18, 45.0),
    ("Av. 6 de Diciembre", [180.0, 280.0, 620.0, 420.0], 17, 42.0),
    ("Calle Bolivia", [80.0, 300.0, 180.0, 400.0], 10, 28.0),
    ("Calle Colombia", [620.0, 300.0, 720.0, 400.0], 10, 28.0),
];

/// Returns the road attributes of the sample city, ready to be added to
/// a network or a simulation.
pub fn sample_city() -> Vec<RoadAttributes<'static>> {
    ROADS
        .iter()
        .map(|&(name, [x1, y1, x2, y2], capacity, nominal_speed)| RoadAttributes {
            name,
            from: Point2d::new(x1, y1),
            to: Point2d::new(x2, y2),
            capacity,
            nominal_speed,
        })
        .collect()
}
