use {
    crate::{Exception, Invoked, SequentialSpec},
    std::collections::VecDeque,
};

/// The exception raised by [`QueueOp::Remove`] on an empty queue.
pub fn no_such_element() -> Exception {
    Exception::new("NoSuchElementException")
}

/// A first-in-first-out queue.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FifoQueue<T>(VecDeque<T>);

/// An operation on a [`FifoQueue`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum QueueOp<T> {
    Offer(T),
    /// Removes and returns the head, or `None` when empty.
    Poll,
    /// Removes and returns the head, raising [`no_such_element`] when empty.
    Remove,
}

/// A return value from a [`FifoQueue`] operation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum QueueRet<T> {
    OfferOk,
    PollOk(Option<T>),
    RemoveOk(T),
}

impl<T> FifoQueue<T> {
    pub fn new() -> Self {
        FifoQueue(VecDeque::new())
    }
}

impl<T> Default for FifoQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SequentialSpec for FifoQueue<T>
where
    T: Clone + PartialEq,
{
    type Op = QueueOp<T>;
    type Ret = QueueRet<T>;

    fn invoke(&mut self, op: &Self::Op) -> Invoked<Self::Ret> {
        match op {
            QueueOp::Offer(item) => {
                self.0.push_back(item.clone());
                Invoked::Completed(QueueRet::OfferOk)
            }
            QueueOp::Poll => Invoked::Completed(QueueRet::PollOk(self.0.pop_front())),
            QueueOp::Remove => match self.0.pop_front() {
                Some(item) => Invoked::Completed(QueueRet::RemoveOk(item)),
                None => Invoked::Raised(no_such_element()),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn orders_first_in_first_out() {
        let mut queue = FifoQueue::new();
        assert_eq!(
            queue.invoke(&QueueOp::Offer(1)),
            Invoked::Completed(QueueRet::OfferOk),
        );
        assert_eq!(
            queue.invoke(&QueueOp::Offer(2)),
            Invoked::Completed(QueueRet::OfferOk),
        );
        assert_eq!(
            queue.invoke(&QueueOp::Poll),
            Invoked::Completed(QueueRet::PollOk(Some(1))),
        );
        assert_eq!(
            queue.invoke(&QueueOp::Remove),
            Invoked::Completed(QueueRet::RemoveOk(2)),
        );
        assert_eq!(
            queue.invoke(&QueueOp::Poll),
            Invoked::Completed(QueueRet::PollOk(None)),
        );
    }

    #[test]
    fn remove_raises_on_empty() {
        let mut queue = FifoQueue::<u64>::new();
        assert_eq!(
            queue.invoke(&QueueOp::Remove),
            Invoked::Raised(no_such_element()),
        );
    }
}
