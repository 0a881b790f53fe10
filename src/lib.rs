pub mod building;
pub mod error;
pub mod profile;
pub mod site;
pub mod solar;
pub mod surface;
pub mod timeseries;
pub mod transposition;

// Prelude
pub use building::{Building, BuildingResult, GenerationRecord, SurfaceSpec};
pub use error::{Error, Result};
pub use profile::{profile_from_name, ViewProfile};
pub use site::Site;
pub use solar::SolarPosition;
pub use surface::{Surface, SurfaceResult, SurfaceType, TiltScan};
pub use timeseries::{Irradiance, MaskedIrradiance, PoaIrradiance, SolarGeometry};
pub use transposition::{IsotropicSky, ShadedArray, Transposition};
