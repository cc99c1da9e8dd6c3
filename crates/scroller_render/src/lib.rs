pub mod gpu_context;
pub mod images;
pub mod present;
pub mod raster;
pub mod vertex;

pub use gpu_context::{GpuContext, GpuError};
pub use images::{placeholder_background, placeholder_sheet, ImageStore};
pub use present::FramePresenter;
pub use raster::RasterSurface;
pub use vertex::FrameVertex;
