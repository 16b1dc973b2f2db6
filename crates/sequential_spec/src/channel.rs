use {
    crate::{Invoked, SequentialSpec},
    std::collections::VecDeque,
};

/// A bounded FIFO channel whose operations suspend at the buffer limits: [`ChannelOp::Receive`]
/// suspends on an empty buffer, and [`ChannelOp::Send`] suspends on a full one. Useful for
/// specifying structures whose concurrent counterparts park the calling coroutine.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BoundedChannel<T> {
    capacity: usize,
    buffer: VecDeque<T>,
}

/// An operation on a [`BoundedChannel`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ChannelOp<T> {
    Send(T),
    Receive,
}

/// A return value from a [`BoundedChannel`] operation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ChannelRet<T> {
    SendOk,
    ReceiveOk(T),
}

impl<T> BoundedChannel<T> {
    pub fn new(capacity: usize) -> Self {
        BoundedChannel {
            capacity,
            buffer: VecDeque::new(),
        }
    }
}

impl<T> SequentialSpec for BoundedChannel<T>
where
    T: Clone + PartialEq,
{
    type Op = ChannelOp<T>;
    type Ret = ChannelRet<T>;

    fn invoke(&mut self, op: &Self::Op) -> Invoked<Self::Ret> {
        match op {
            ChannelOp::Send(item) => {
                if self.buffer.len() == self.capacity {
                    return Invoked::Suspended;
                }
                self.buffer.push_back(item.clone());
                Invoked::Completed(ChannelRet::SendOk)
            }
            ChannelOp::Receive => match self.buffer.pop_front() {
                Some(item) => Invoked::Completed(ChannelRet::ReceiveOk(item)),
                None => Invoked::Suspended,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn suspends_at_buffer_limits() {
        let mut channel = BoundedChannel::new(1);
        assert_eq!(channel.invoke(&ChannelOp::Receive), Invoked::Suspended);
        assert_eq!(
            channel.invoke(&ChannelOp::Send('a')),
            Invoked::Completed(ChannelRet::SendOk),
        );
        assert_eq!(channel.invoke(&ChannelOp::Send('b')), Invoked::Suspended);
        assert_eq!(
            channel.invoke(&ChannelOp::Receive),
            Invoked::Completed(ChannelRet::ReceiveOk('a')),
        );
    }

    #[test]
    fn suspension_leaves_state_unchanged() {
        let mut channel = BoundedChannel::<char>::new(0);
        let before = channel.clone();
        assert_eq!(channel.invoke(&ChannelOp::Receive), Invoked::Suspended);
        assert_eq!(channel.invoke(&ChannelOp::Send('x')), Invoked::Suspended);
        assert_eq!(channel, before);
    }
}
