//! 类型注册表
//!
//! 字符串标签 -> 构造函数。头部、负载、数据包、节点、链路、事件各有一张表，
//! 调度器和节点逻辑只通过标签创建实例，新增类型不需要改动它们。
//! 注册在仿真开始前显式完成（见 [`TypeRegistry::with_defaults`]）。

use std::any::Any;
use std::collections::BTreeMap;

use super::error::NetError;
use super::gen_packet::{GenCtrlPacket, GenDataPacket};
use super::header::{ControlHeader, DataHeader, Header};
use super::id::NodeId;
use super::link::{Link, LinkParams, SimpleLink};
use super::node::{Node, Switch};
use super::packet::{Packet, PacketParts};
use super::payload::{ControlPayload, DataPayload, Payload};
use super::recv_packet::RecvPacket;
use super::send_packet::SendPacket;
use crate::sim::Event;
use tracing::{debug, warn};

/// 内置类型标签
pub mod tags {
    pub const DATA_HEADER: &str = "data_header";
    pub const CTRL_HEADER: &str = "ctrl_header";
    pub const DATA_PAYLOAD: &str = "data_payload";
    pub const CTRL_PAYLOAD: &str = "ctrl_payload";
    pub const DATA_PACKET: &str = "data_packet";
    pub const CTRL_PACKET: &str = "ctrl_packet";
    pub const SWITCH: &str = "switch";
    pub const SIMPLE_LINK: &str = "simple_link";
    pub const RECV_EVENT: &str = "recv_event";
    pub const SEND_EVENT: &str = "send_event";
    pub const DATA_GEN_EVENT: &str = "data_pkt_gen_event";
    pub const CTRL_GEN_EVENT: &str = "ctrl_pkt_gen_event";
}

type Ctor<T, A> = Box<dyn Fn(A) -> Result<T, NetError>>;

/// 一张注册表：标签 -> 构造函数
pub struct Registry<T, A> {
    family: &'static str,
    ctors: BTreeMap<String, Ctor<T, A>>,
}

impl<T, A> Registry<T, A> {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            ctors: BTreeMap::new(),
        }
    }

    /// 注册（或覆盖）一个类型
    pub fn register<F>(&mut self, tag: impl Into<String>, ctor: F)
    where
        F: Fn(A) -> Result<T, NetError> + 'static,
    {
        let tag = tag.into();
        debug!(family = self.family, tag = %tag, "注册类型");
        self.ctors.insert(tag, Box::new(ctor));
    }

    /// 按标签创建实例；未注册的标签返回 `UnknownType`
    pub fn create(&self, tag: &str, args: A) -> Result<T, NetError> {
        match self.ctors.get(tag) {
            Some(ctor) => ctor(args),
            None => {
                warn!(family = self.family, tag, "no such type");
                Err(NetError::UnknownType {
                    family: self.family,
                    tag: tag.to_string(),
                })
            }
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.ctors.contains_key(tag)
    }

    /// 已注册的标签（按字典序）
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.ctors.keys().map(String::as_str)
    }
}

/// 事件构造参数：具体事件的字段，由构造函数向下转型
pub type EventArgs = Box<dyn Any + Send>;

/// 六张注册表的集合
pub struct TypeRegistry {
    pub headers: Registry<Header, ()>,
    pub payloads: Registry<Payload, ()>,
    pub packets: Registry<Packet, PacketParts>,
    pub nodes: Registry<Box<dyn Node>, NodeId>,
    pub links: Registry<Box<dyn Link>, LinkParams>,
    pub events: Registry<Box<dyn Event>, EventArgs>,
}

impl TypeRegistry {
    /// 空注册表
    pub fn empty() -> Self {
        Self {
            headers: Registry::new("header"),
            payloads: Registry::new("payload"),
            packets: Registry::new("packet"),
            nodes: Registry::new("node"),
            links: Registry::new("link"),
            events: Registry::new("event"),
        }
    }

    /// 注册所有内置类型
    pub fn with_defaults() -> Self {
        let mut r = Self::empty();

        r.headers
            .register(tags::DATA_HEADER, |()| Ok(Header::Data(DataHeader::default())));
        r.headers.register(tags::CTRL_HEADER, |()| {
            Ok(Header::Control(ControlHeader::default()))
        });

        r.payloads.register(tags::DATA_PAYLOAD, |()| {
            Ok(Payload::Data(DataPayload::default()))
        });
        r.payloads.register(tags::CTRL_PAYLOAD, |()| {
            Ok(Payload::Control(ControlPayload::default()))
        });

        r.packets.register(tags::DATA_PACKET, Packet::assemble_data);
        r.packets.register(tags::CTRL_PACKET, Packet::assemble_control);

        r.nodes
            .register(tags::SWITCH, |id| Ok(Box::new(Switch::new(id)) as Box<dyn Node>));

        r.links.register(tags::SIMPLE_LINK, |params| {
            Ok(Box::new(SimpleLink::new(params)) as Box<dyn Link>)
        });

        r.events.register(tags::RECV_EVENT, downcast_event::<RecvPacket>(tags::RECV_EVENT));
        r.events.register(tags::SEND_EVENT, downcast_event::<SendPacket>(tags::SEND_EVENT));
        r.events.register(
            tags::DATA_GEN_EVENT,
            downcast_event::<GenDataPacket>(tags::DATA_GEN_EVENT),
        );
        r.events.register(
            tags::CTRL_GEN_EVENT,
            downcast_event::<GenCtrlPacket>(tags::CTRL_GEN_EVENT),
        );

        r
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// 事件构造函数：参数本身就是事件，向下转型成功即可
fn downcast_event<E: Event>(
    tag: &'static str,
) -> impl Fn(EventArgs) -> Result<Box<dyn Event>, NetError> {
    move |args: EventArgs| match args.downcast::<E>() {
        Ok(ev) => Ok(ev as Box<dyn Event>),
        Err(_) => Err(NetError::TypeMismatch {
            family: "event",
            tag: tag.to_string(),
        }),
    }
}
