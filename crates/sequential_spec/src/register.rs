use crate::{Invoked, SequentialSpec};

/// A read/write register holding a single value.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Register<T>(pub T);

/// An operation on a [`Register`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RegisterOp<T> {
    Read,
    Write(T),
}

/// A return value from a [`Register`] operation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RegisterRet<T> {
    ReadOk(T),
    WriteOk,
}

impl<T> SequentialSpec for Register<T>
where
    T: Clone + PartialEq,
{
    type Op = RegisterOp<T>;
    type Ret = RegisterRet<T>;

    fn invoke(&mut self, op: &Self::Op) -> Invoked<Self::Ret> {
        match op {
            RegisterOp::Read => Invoked::Completed(RegisterRet::ReadOk(self.0.clone())),
            RegisterOp::Write(value) => {
                self.0 = value.clone();
                Invoked::Completed(RegisterRet::WriteOk)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn models_reads_and_writes() {
        let mut register = Register("initial");
        assert_eq!(
            register.invoke(&RegisterOp::Read),
            Invoked::Completed(RegisterRet::ReadOk("initial")),
        );
        assert_eq!(
            register.invoke(&RegisterOp::Write("updated")),
            Invoked::Completed(RegisterRet::WriteOk),
        );
        assert_eq!(
            register.invoke(&RegisterOp::Read),
            Invoked::Completed(RegisterRet::ReadOk("updated")),
        );
    }
}
