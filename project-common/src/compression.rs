use std::io::{self, Read, Write};
use flate2::{Compression, write::GzEncoder, read::GzDecoder};

/// 魔数常量 - 用于标识快照文件格式
pub const MAGIC_BYTES: &[u8] = b"PJCMP"; // Project Compressed

/// 快照文件头长度：魔数 + 版本号(2) + 原始大小(4)
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 默认支持的最大主版本号
pub const DEFAULT_MAX_VERSION: u8 = 1;

/// 快照文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    /// 版本号 [主版本, 次版本]
    pub version: [u8; 2],
    /// 压缩前的数据大小
    pub original_size: u32,
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, io::Error> {
    bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("序列化失败: {}", e)))
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    bincode::serde::decode_from_slice(data, bincode::config::standard())
        .map_err(|e| invalid(format!("反序列化失败: {}", e)))
        .map(|(value, _)| value)
}

/// 读取并校验文件头
pub fn read_header(data: &[u8], max_version: u8) -> Result<SnapshotHeader, io::Error> {
    if data.len() < HEADER_LEN {
        return Err(invalid(format!("数据太短，无法解析: {} 字节", data.len())));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(invalid("无效的文件格式：魔数不匹配".to_string()));
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(invalid(format!("不支持的版本: {}.{}", version[0], version[1])));
    }

    let size_offset = version_offset + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..HEADER_LEN]);

    Ok(SnapshotHeader {
        version,
        original_size: u32::from_le_bytes(size_bytes),
    })
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, io::Error> {
    let binary = to_binary(obj)?;
    let data_len = u32::try_from(binary.len())
        .map_err(|_| invalid(format!("数据过大: {} 字节", binary.len())))?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&data_len.to_le_bytes());

    let mut encoder = GzEncoder::new(output, Compression::best());
    encoder.write_all(&binary)?;
    encoder.finish()
}

/// 从压缩的二进制格式反序列化对象，使用默认最大版本
pub fn from_compressed<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    from_compressed_with_max_version(data, DEFAULT_MAX_VERSION)
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: for<'a> serde::de::Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> Result<T, io::Error> {
    let header = read_header(data, max_version)?;

    let mut decoder = GzDecoder::new(&data[HEADER_LEN..]);
    let mut decompressed = Vec::with_capacity(header.original_size as usize);
    decoder.read_to_end(&mut decompressed)?;

    if decompressed.len() != header.original_size as usize {
        return Err(invalid(format!(
            "解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
            header.original_size,
            decompressed.len()
        )));
    }

    from_binary(&decompressed)
}

/// 验证压缩数据是否有效，返回版本号
pub fn validate_compressed_data(data: &[u8]) -> Result<[u8; 2], io::Error> {
    read_header(data, DEFAULT_MAX_VERSION).map(|header| header.version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateSource, ProjectRecord};

    fn sample() -> Vec<ProjectRecord> {
        vec![
            ProjectRecord::new("1", "Marketing Campaign Hub")
                .with_category("Marketing")
                .with_industry(["FMCG", "Retail"])
                .with_time_updated(DateSource::Iso("2024-03-15T10:00:00Z".into())),
            ProjectRecord::new("2", "Customer Success Portal")
                .with_time_updated(DateSource::Seconds(1_700_000_000.0)),
        ]
    }

    #[test]
    fn compressed_records_survive() {
        let data = to_compressed(&sample(), [1, 0]).unwrap();
        assert_eq!(&data[..MAGIC_BYTES.len()], MAGIC_BYTES);
        assert_eq!(validate_compressed_data(&data).unwrap(), [1, 0]);

        let restored: Vec<ProjectRecord> = from_compressed(&data).unwrap();
        assert_eq!(restored, sample());
    }

    #[test]
    fn rejects_short_and_foreign_data() {
        let err = validate_compressed_data(b"PJC").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = validate_compressed_data(b"NECMP\x01\x00\x00\x00\x00\x00").unwrap_err();
        assert!(err.to_string().contains("魔数"));
    }

    #[test]
    fn rejects_newer_major_version() {
        let data = to_compressed(&sample(), [2, 0]).unwrap();
        assert!(validate_compressed_data(&data).is_err());
        assert!(from_compressed::<Vec<ProjectRecord>>(&data).is_err());
        assert!(from_compressed_with_max_version::<Vec<ProjectRecord>>(&data, 2).is_ok());
    }

    #[test]
    fn detects_size_mismatch() {
        let mut data = to_compressed(&sample(), [1, 0]).unwrap();
        let size_offset = MAGIC_BYTES.len() + 2;
        data[size_offset] = data[size_offset].wrapping_add(1);
        let err = from_compressed::<Vec<ProjectRecord>>(&data).unwrap_err();
        assert!(err.to_string().contains("不匹配"));
    }
}
