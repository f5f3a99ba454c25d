//! Xcode project graph model and `.pbxproj` serializer
//!
//! This crate reads `project.pbxproj` files into a typed, reference-based
//! object graph and writes them back the way Xcode does:
//!
//! - **Reading**: ASCII (OpenStep), XML and binary property lists
//! - **Model**: one typed node per `isa`, stored by reference in [`Objects`]
//! - **Editing**: groups, file references and build files
//! - **Writing**: Xcode-canonical text with sections, sorting and comments
//!
//! # Example
//!
//! ```rust,no_run
//! use pbxkit::{GroupAddingOptions, SourceTree, XcodeProj};
//!
//! let mut project = XcodeProj::open("App.xcodeproj")?;
//! let source_root = project.source_root();
//! let main_group = project.pbxproj.main_group().cloned().expect("main group");
//! let objects = &mut project.pbxproj.objects;
//! let groups = objects.add_group("Sources/Feature", &main_group, GroupAddingOptions::default())?;
//! if let Some((group, _)) = groups.last() {
//!     objects.add_file(
//!         &source_root.join("Sources/Feature/View.swift"),
//!         group,
//!         SourceTree::Group,
//!         &source_root,
//!     )?;
//! }
//! project.save()?;
//! # Ok::<(), pbxkit::ProjError>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod encoder;
pub mod error;
pub mod helpers;
pub mod objects;
pub mod plist;
pub mod proj;
pub mod reference;
pub mod store;
pub mod xcodeproj;

pub use encoder::PbxProjEncoder;
pub use error::{ProjError, Result};
pub use helpers::GroupAddingOptions;
pub use objects::{Object, ObjectKind, ProductType, SourceTree};
pub use proj::PbxProj;
pub use reference::Reference;
pub use store::Objects;
pub use xcodeproj::XcodeProj;
