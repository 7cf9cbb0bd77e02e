pub mod decode;
pub mod dimensions;
pub mod encode;
pub mod orientation;
pub mod params;
pub mod pipeline;
pub mod resize;

pub use decode::decode_image;
pub use dimensions::calculate_target_dimensions;
pub use encode::encode_jpeg;
pub use orientation::Orientation;
pub use params::{ResizePolicy, TranscodeOptions};
pub use pipeline::transcode;
pub use resize::resize_image;
