//! 网络世界实现
//!
//! 定义网络仿真的世界（World）实现，持有网络拓扑。

use super::network::Network;
use crate::sim::World;
use std::any::Any;

/// 一个默认的网络世界实现：持有 Network。
#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// 从事件拿到的世界中取出网络；世界不是 NetWorld 时返回 None
pub(crate) fn net_of(world: &mut dyn World) -> Option<&mut Network> {
    world
        .as_any_mut()
        .downcast_mut::<NetWorld>()
        .map(|w| &mut w.net)
}
