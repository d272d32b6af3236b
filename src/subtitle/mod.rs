pub mod files;
pub mod normalize;

pub use files::{
    convert_files, convert_vtt_file, find_vtt_files, is_caption_for, produced_captions,
    ConversionReport,
};
pub use normalize::{is_timestamp, normalize_file, normalize_vtt, strip_tags, transcript_lines};
