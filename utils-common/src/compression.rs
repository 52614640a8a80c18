use std::io::{self, Read, Write};

use bincode::{Decode, Encode};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use thiserror::Error;

/// 魔数常量 - 用于标识紧凑索引格式
pub const MAGIC_BYTES: &[u8] = b"PLIDX"; // Post List InDeX

/// 当前写入的索引版本号
pub const INDEX_VERSION: [u8; 2] = [1, 0];

/// 头部长度：魔数 + 版本号(2) + 原始大小(4)
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 紧凑索引编解码错误
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("数据太短，无法解析: {0} 字节")]
    TooShort(usize),
    #[error("无效的文件格式：魔数不匹配")]
    BadMagic,
    #[error("不支持的版本: {0}.{1}")]
    UnsupportedVersion(u8, u8),
    #[error("解压后数据大小不匹配: 期望 {expected} 字节, 实际 {actual} 字节")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("压缩数据读写失败: {0}")]
    Io(#[from] io::Error),
    #[error("序列化失败: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("反序列化失败: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

/// 解析后的头部
struct Header<'a> {
    original_size: usize,
    payload: &'a [u8],
}

/// 数据是否以紧凑索引魔数开头
pub fn is_compressed(data: &[u8]) -> bool {
    data.starts_with(MAGIC_BYTES)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: Encode>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, CompressionError> {
    let binary = bincode::encode_to_vec(obj, bincode::config::standard())?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&(binary.len() as u32).to_le_bytes());

    let mut encoder = GzEncoder::new(output, Compression::best());
    encoder.write_all(&binary)?;
    Ok(encoder.finish()?)
}

/// 从压缩的二进制格式反序列化对象，只接受不高于当前主版本的数据
pub fn from_compressed<T: Decode<()>>(data: &[u8]) -> Result<T, CompressionError> {
    let header = parse_header(data, INDEX_VERSION[0])?;

    let mut decoder = GzDecoder::new(header.payload);
    let mut decompressed = Vec::with_capacity(header.original_size);
    decoder.read_to_end(&mut decompressed)?;

    if decompressed.len() != header.original_size {
        return Err(CompressionError::SizeMismatch {
            expected: header.original_size,
            actual: decompressed.len(),
        });
    }

    let (value, _) = bincode::decode_from_slice(&decompressed, bincode::config::standard())?;
    Ok(value)
}

fn parse_header(data: &[u8], max_version: u8) -> Result<Header<'_>, CompressionError> {
    if data.len() < HEADER_LEN {
        return Err(CompressionError::TooShort(data.len()));
    }
    if !is_compressed(data) {
        return Err(CompressionError::BadMagic);
    }

    let version_offset = MAGIC_BYTES.len();
    let (major, minor) = (data[version_offset], data[version_offset + 1]);
    if major > max_version {
        return Err(CompressionError::UnsupportedVersion(major, minor));
    }

    let size_offset = version_offset + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..HEADER_LEN]);

    Ok(Header {
        original_size: u32::from_le_bytes(size_bytes) as usize,
        payload: &data[HEADER_LEN..],
    })
}
