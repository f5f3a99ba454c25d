use super::fields::Fields;
use super::{Node, Number, ObjectKind};
use crate::error::Result;
use crate::plist::{CommentedString, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// What a container item proxy points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProxyType {
    NativeTarget,
    Reference,
    /// Any other code, kept as written
    Other(Number),
}

impl ProxyType {
    pub fn from_number(number: Number) -> Self {
        match number.as_str() {
            "1" => ProxyType::NativeTarget,
            "2" => ProxyType::Reference,
            _ => ProxyType::Other(number),
        }
    }

    pub fn number(&self) -> Number {
        match self {
            ProxyType::NativeTarget => Number::from(1),
            ProxyType::Reference => Number::from(2),
            ProxyType::Other(number) => number.clone(),
        }
    }
}

/// `PBXContainerItemProxy`: indirection to an object in this or another project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerItemProxy {
    pub container_portal: Reference,
    pub proxy_type: Option<ProxyType>,
    pub remote_global_id_string: Option<String>,
    pub remote_info: Option<String>,
}

impl Node for ContainerItemProxy {
    const KIND: ObjectKind = ObjectKind::ContainerItemProxy;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            container_portal: fields.required_reference("containerPortal")?,
            proxy_type: fields.number("proxyType")?.map(ProxyType::from_number),
            remote_global_id_string: fields.string("remoteGlobalIDString")?,
            remote_info: fields.string("remoteInfo")?,
        })
    }

    fn encode(&self, _objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        fragment.set(
            "containerPortal",
            PlistValue::commented(self.container_portal.as_str(), Some("Project object")),
        );
        fragment.set_opt("proxyType", self.proxy_type.as_ref().map(ProxyType::number));
        fragment.set_opt("remoteGlobalIDString", self.remote_global_id_string.as_ref());
        fragment.set_opt("remoteInfo", self.remote_info.as_ref());
        (
            CommentedString::with_comment(reference.as_str(), Some(Self::KIND.isa())),
            fragment.into_value(),
        )
    }
}
