//! PostgreSQL value conversion: literal encoding and column decoding

mod decode;
mod encode;

pub use decode::{decode, decode_money, decode_point};
pub use encode::{
    EncodeError, encode, encode_date, encode_point, encode_reference, encode_scalar, encode_text,
    encode_timestamp, literal,
};
