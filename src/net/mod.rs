//! 网络模拟模块
//!
//! 此模块包含网络模拟的核心组件，如节点、链路、数据包、事件和类型注册表。

// 子模块声明
mod error;
mod gen_packet;
mod header;
mod id;
mod link;
mod net_world;
mod network;
mod node;
mod packet;
mod payload;
mod recv_packet;
pub mod registry;
mod routing;
mod send_packet;
mod stats;

// 重新导出公共接口
pub use error::NetError;
pub use gen_packet::{GenCtrlPacket, GenDataPacket};
pub use header::{ControlHeader, DataHeader, Header, HeaderFields};
pub use id::{LinkId, NodeId};
pub use link::{Link, LinkParams, SimpleLink};
pub use net_world::NetWorld;
pub use network::{LinkConfig, Network};
pub use node::{Node, NodeBase, Switch};
pub use packet::{ControlPacket, DataPacket, Packet, PacketKind, PacketParts};
pub use payload::{ControlPayload, DataPayload, LinkState, Payload};
pub use recv_packet::RecvPacket;
pub use registry::{tags, EventArgs, Registry, TypeRegistry};
pub use routing::{Advert, RoutingState};
pub use send_packet::SendPacket;
pub use stats::Stats;
