//! Source trees: what a file element's `path` is relative to

use std::fmt;

/// The "Location" of a file element in Xcode's file inspector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceTree {
    None,
    Absolute,
    Group,
    SourceRoot,
    BuildProductsDir,
    SdkRoot,
    DeveloperDir,
    Custom(String),
}

impl SourceTree {
    /// Parse the plist representation
    pub fn parse(value: &str) -> Self {
        match value {
            "" => SourceTree::None,
            "<absolute>" => SourceTree::Absolute,
            "<group>" => SourceTree::Group,
            "SOURCE_ROOT" => SourceTree::SourceRoot,
            "BUILT_PRODUCTS_DIR" => SourceTree::BuildProductsDir,
            "SDKROOT" => SourceTree::SdkRoot,
            "DEVELOPER_DIR" => SourceTree::DeveloperDir,
            other => SourceTree::Custom(other.to_string()),
        }
    }

    /// The plist representation
    pub fn as_str(&self) -> &str {
        match self {
            SourceTree::None => "",
            SourceTree::Absolute => "<absolute>",
            SourceTree::Group => "<group>",
            SourceTree::SourceRoot => "SOURCE_ROOT",
            SourceTree::BuildProductsDir => "BUILT_PRODUCTS_DIR",
            SourceTree::SdkRoot => "SDKROOT",
            SourceTree::DeveloperDir => "DEVELOPER_DIR",
            SourceTree::Custom(value) => value,
        }
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        SourceTree::Group
    }
}

impl fmt::Display for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceTree {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SourceTree::parse(s))
    }
}
