//! Target product types

use std::fmt;

/// `productType` of a native target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductType {
    None,
    Application,
    Framework,
    DynamicLibrary,
    StaticLibrary,
    Bundle,
    UnitTestBundle,
    UiTestBundle,
    AppExtension,
    CommandLineTool,
    WatchApp,
    Watch2App,
    WatchExtension,
    Watch2Extension,
    TvExtension,
    MessagesApplication,
    MessagesExtension,
    StickerPack,
    XpcService,
    OcUnitTestBundle,
    XcodeExtension,
    Custom(String),
}

const IDENTIFIERS: [(ProductType, &str); 21] = [
    (ProductType::None, ""),
    (ProductType::Application, "com.apple.product-type.application"),
    (ProductType::Framework, "com.apple.product-type.framework"),
    (ProductType::DynamicLibrary, "com.apple.product-type.library.dynamic"),
    (ProductType::StaticLibrary, "com.apple.product-type.library.static"),
    (ProductType::Bundle, "com.apple.product-type.bundle"),
    (ProductType::UnitTestBundle, "com.apple.product-type.bundle.unit-test"),
    (ProductType::UiTestBundle, "com.apple.product-type.bundle.ui-testing"),
    (ProductType::AppExtension, "com.apple.product-type.app-extension"),
    (ProductType::CommandLineTool, "com.apple.product-type.tool"),
    (ProductType::WatchApp, "com.apple.product-type.application.watchapp"),
    (ProductType::Watch2App, "com.apple.product-type.application.watchapp2"),
    (ProductType::WatchExtension, "com.apple.product-type.watchkit-extension"),
    (ProductType::Watch2Extension, "com.apple.product-type.watchkit2-extension"),
    (ProductType::TvExtension, "com.apple.product-type.tv-app-extension"),
    (ProductType::MessagesApplication, "com.apple.product-type.application.messages"),
    (ProductType::MessagesExtension, "com.apple.product-type.app-extension.messages"),
    (
        ProductType::StickerPack,
        "com.apple.product-type.app-extension.messages-sticker-pack",
    ),
    (ProductType::XpcService, "com.apple.product-type.xpc-service"),
    (ProductType::OcUnitTestBundle, "com.apple.product-type.bundle.ocunit-test"),
    (ProductType::XcodeExtension, "com.apple.product-type.xcode-extension"),
];

impl ProductType {
    /// Parse a `com.apple.product-type.*` identifier
    pub fn parse(value: &str) -> Self {
        IDENTIFIERS
            .iter()
            .find(|(_, id)| *id == value)
            .map(|(kind, _)| kind.clone())
            .unwrap_or_else(|| ProductType::Custom(value.to_string()))
    }

    /// The product type identifier
    pub fn identifier(&self) -> &str {
        if let ProductType::Custom(value) = self {
            return value;
        }
        IDENTIFIERS
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, id)| *id)
            .unwrap_or_default()
    }

    /// File extension of the built product, if it has one
    pub fn file_extension(&self) -> Option<&'static str> {
        match self {
            ProductType::Application
            | ProductType::WatchApp
            | ProductType::Watch2App
            | ProductType::MessagesApplication => Some("app"),
            ProductType::Framework => Some("framework"),
            ProductType::DynamicLibrary => Some("dylib"),
            ProductType::StaticLibrary => Some("a"),
            ProductType::Bundle => Some("bundle"),
            ProductType::UnitTestBundle | ProductType::UiTestBundle => Some("xctest"),
            ProductType::AppExtension
            | ProductType::TvExtension
            | ProductType::WatchExtension
            | ProductType::Watch2Extension
            | ProductType::MessagesExtension
            | ProductType::StickerPack
            | ProductType::XcodeExtension => Some("appex"),
            ProductType::XpcService => Some("xpc"),
            ProductType::OcUnitTestBundle => Some("octest"),
            ProductType::CommandLineTool | ProductType::None | ProductType::Custom(_) => None,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip() {
        for (kind, id) in IDENTIFIERS.iter() {
            assert_eq!(&ProductType::parse(id), kind);
            assert_eq!(kind.identifier(), *id);
        }
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ProductType::Application.file_extension(), Some("app"));
        assert_eq!(ProductType::UiTestBundle.file_extension(), Some("xctest"));
        assert_eq!(ProductType::CommandLineTool.file_extension(), None);
        let custom = ProductType::parse("com.apple.product-type.instruments-package");
        assert_eq!(custom.identifier(), "com.apple.product-type.instruments-package");
        assert_eq!(custom.file_extension(), None);
    }
}
