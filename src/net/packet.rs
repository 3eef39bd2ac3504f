//! 数据包类型
//!
//! 数据包是封闭的两种变体（数据 / 控制），每个包独占一个头部和一个负载。
//! 复制（replicate）沿用原序列号，接收方据此去重。

use super::error::NetError;
use super::header::{ControlHeader, DataHeader, Header, HeaderFields};
use super::payload::{ControlPayload, DataPayload, Payload};
use super::registry::tags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 数据包类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Data,
    Control,
}

impl PacketKind {
    /// 数据包注册表中的类型标签
    pub fn tag(self) -> &'static str {
        match self {
            PacketKind::Data => tags::DATA_PACKET,
            PacketKind::Control => tags::CTRL_PACKET,
        }
    }

    pub fn header_tag(self) -> &'static str {
        match self {
            PacketKind::Data => tags::DATA_HEADER,
            PacketKind::Control => tags::CTRL_HEADER,
        }
    }

    pub fn payload_tag(self) -> &'static str {
        match self {
            PacketKind::Data => tags::DATA_PAYLOAD,
            PacketKind::Control => tags::CTRL_PAYLOAD,
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 数据流的数据包
#[derive(Debug, Clone, PartialEq)]
pub struct DataPacket {
    pub id: u64,
    pub size: f64,
    pub header: DataHeader,
    pub payload: DataPayload,
}

/// 链路状态通告包
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPacket {
    pub id: u64,
    pub size: f64,
    pub header: ControlHeader,
    pub payload: ControlPayload,
}

/// 交给数据包构造函数的原料
#[derive(Debug, Clone)]
pub struct PacketParts {
    pub id: u64,
    pub size: f64,
    pub header: Header,
    pub payload: Payload,
}

/// 网络数据包
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Data(DataPacket),
    Control(ControlPacket),
}

impl Packet {
    /// 数据包构造函数：要求数据头部 + 数据负载
    pub fn assemble_data(parts: PacketParts) -> Result<Packet, NetError> {
        match (parts.header, parts.payload) {
            (Header::Data(header), Payload::Data(payload)) => Ok(Packet::Data(DataPacket {
                id: parts.id,
                size: parts.size,
                header,
                payload,
            })),
            _ => Err(NetError::TypeMismatch {
                family: "packet",
                tag: tags::DATA_PACKET.to_string(),
            }),
        }
    }

    /// 控制包构造函数：要求控制头部 + 控制负载
    pub fn assemble_control(parts: PacketParts) -> Result<Packet, NetError> {
        match (parts.header, parts.payload) {
            (Header::Control(header), Payload::Control(payload)) => {
                Ok(Packet::Control(ControlPacket {
                    id: parts.id,
                    size: parts.size,
                    header,
                    payload,
                }))
            }
            _ => Err(NetError::TypeMismatch {
                family: "packet",
                tag: tags::CTRL_PACKET.to_string(),
            }),
        }
    }

    /// 序列号
    pub fn id(&self) -> u64 {
        match self {
            Packet::Data(p) => p.id,
            Packet::Control(p) => p.id,
        }
    }

    pub fn size(&self) -> f64 {
        match self {
            Packet::Data(p) => p.size,
            Packet::Control(p) => p.size,
        }
    }

    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Data(_) => PacketKind::Data,
            Packet::Control(_) => PacketKind::Control,
        }
    }

    pub fn fields(&self) -> &HeaderFields {
        match self {
            Packet::Data(p) => &p.header.fields,
            Packet::Control(p) => &p.header.fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut HeaderFields {
        match self {
            Packet::Data(p) => &mut p.header.fields,
            Packet::Control(p) => &mut p.header.fields,
        }
    }

    pub fn set_msg(&mut self, msg: impl Into<String>) {
        match self {
            Packet::Data(p) => p.payload.msg = msg.into(),
            Packet::Control(p) => p.payload.msg = msg.into(),
        }
    }

    pub fn msg(&self) -> &str {
        match self {
            Packet::Data(p) => &p.payload.msg,
            Packet::Control(p) => &p.payload.msg,
        }
    }

    /// 日志行末尾的附加信息：数据包为当前标签，控制包为通告者
    pub fn annotation(&self) -> String {
        match self {
            Packet::Data(p) => match p.header.top_label() {
                Some(label) => format!(" label {label}"),
                None => " label x".to_string(),
            },
            Packet::Control(p) => format!(" from {}", p.payload.advertiser),
        }
    }

    /// 复制出同一逻辑包的另一份（序列号不变）
    pub fn replicate(&self) -> Packet {
        self.clone()
    }
}
