use super::fields::Fields;
use super::{Number, SourceTree};
use crate::error::Result;
use crate::plist::Fragment;

/// Attributes shared by file references and every group kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileElement {
    pub source_tree: Option<SourceTree>,
    pub path: Option<String>,
    pub name: Option<String>,
    pub include_in_index: Option<bool>,
    pub uses_tabs: Option<bool>,
    pub indent_width: Option<Number>,
    pub tab_width: Option<Number>,
    pub wraps_lines: Option<bool>,
    pub comments: Option<String>,
}

impl FileElement {
    pub fn new(source_tree: SourceTree, path: Option<String>, name: Option<String>) -> Self {
        Self {
            source_tree: Some(source_tree),
            path,
            name,
            ..Default::default()
        }
    }

    /// `name`, falling back to `path`
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }

    pub(crate) fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            source_tree: fields.string("sourceTree")?.map(|s| SourceTree::parse(&s)),
            path: fields.string("path")?,
            name: fields.string("name")?,
            include_in_index: fields.flag("includeInIndex")?,
            uses_tabs: fields.flag("usesTabs")?,
            indent_width: fields.number("indentWidth")?,
            tab_width: fields.number("tabWidth")?,
            wraps_lines: fields.flag("wrapsLines")?,
            comments: fields.string("comments")?,
        })
    }

    pub(crate) fn write(&self, fragment: &mut Fragment) {
        fragment.set_opt("name", self.name.as_ref());
        fragment.set_opt("path", self.path.as_ref());
        fragment.set_opt("sourceTree", self.source_tree.as_ref());
        fragment.set_opt_flag("includeInIndex", self.include_in_index);
        fragment.set_opt_flag("usesTabs", self.uses_tabs);
        fragment.set_opt("indentWidth", self.indent_width.as_ref());
        fragment.set_opt("tabWidth", self.tab_width.as_ref());
        fragment.set_opt_flag("wrapsLines", self.wraps_lines);
        fragment.set_opt("comments", self.comments.as_ref());
    }
}
