mod department;
mod facility;
mod model;
mod placement;
mod relations;
mod solution;

pub use department::Department;
pub use facility::Facility;
pub use model::LayoutModel;
pub use placement::{PlacedDepartment, Placement};
pub use relations::RelationMatrices;
pub use solution::{BoundingExtent, Solution};
