use std::sync::Arc;

use anyhow::Result;
use solshade::{Building, Site, SurfaceSpec};

fn main() -> Result<()> {
    // Riverside tower in Brisbane: mild terrain horizon to the east.
    let site = Site::new(-27.47, 153.03, 10.0)
        .with_horizon(&[0.0, 60.0, 90.0, 120.0, 360.0], &[0.0, 2.0, 4.0, 2.0, 0.0])?;

    let mut building = Building::new("riverside-tower", 0.0, Arc::new(site), 8);
    let specs = vec![
        SurfaceSpec {
            name: "north-facade".to_string(),
            surface_type: "FACADE".to_string(),
            azimuth: 0.0,
            profile: "BACKED".to_string(),
            tilt: 90.0,
            area_per_level: 42.0,
            efficiency: 0.2,
        },
        SurfaceSpec {
            name: "east-facade".to_string(),
            surface_type: "FACADE".to_string(),
            azimuth: 90.0,
            profile: "BACKED".to_string(),
            tilt: 90.0,
            area_per_level: 35.0,
            efficiency: 0.2,
        },
        SurfaceSpec {
            name: "nw-balcony".to_string(),
            surface_type: "BALCONY".to_string(),
            azimuth: 315.0,
            profile: "NW_BALCONY".to_string(),
            tilt: 90.0,
            area_per_level: 12.0,
            efficiency: 0.18,
        },
    ];
    building.add_surfaces(&specs)?;

    let result = building.calculate_irradiance()?;

    println!("Building: {} ({} levels)", building.name, building.levels);
    for (name, total_kwh) in result.generation_by_surface() {
        println!("  {name:>14}: {total_kwh:10.1} kWh/year");
    }
    println!(
        "  {:>14}: {:10.1} kWh/year",
        "total",
        result.total_generation_kwh()
    );

    // Tilt scan for the north facade.
    let tilts: Vec<f64> = (0..10).map(|t| t as f64 * 10.0).collect();
    let scan = building.surfaces()["north-facade"].find_optimal_tilt(&tilts)?;
    println!("Optimal north-facade tilt: {}°", scan.best_tilt);

    // Machine-readable capture profile for downstream plotting.
    let profile = result.hourly_mean_generation();
    println!("{}", serde_json::to_string(&profile.to_vec())?);

    Ok(())
}
