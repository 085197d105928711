mod resize_handle;

pub use resize_handle::{HANDLE_HALF_EXTENT, ResizeHandle};
