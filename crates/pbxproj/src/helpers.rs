//! Queries and edits on the object store
//!
//! Relationships that are not stored as edges (the parent group of an
//! element, the phase that owns a build file) are found by searching.

use crate::error::{ProjError, Result};
use crate::objects::{
    last_known_file_type, BuildFile, FileElement, FileReference, Group, Object, ObjectKind,
    SourceTree, SourcesBuildPhase, Target,
};
use crate::reference::Reference;
use crate::store::Objects;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Options for [`Objects::add_group`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupAddingOptions {
    /// Create groups with a name only, not backed by a folder
    pub without_folder: bool,
}

impl GroupAddingOptions {
    pub const WITHOUT_FOLDER: Self = Self {
        without_folder: true,
    };
}

// Names used in comments

impl Objects {
    /// `name` or `path` of a file element (or the path of a reference proxy)
    pub fn file_name(&self, reference: &str) -> Option<&str> {
        match self.get(reference)? {
            Object::ReferenceProxy(proxy) => proxy.path.as_deref(),
            object => object.as_file_element()?.display_name(),
        }
    }

    /// File name of the file a build file points at, or its package product name
    pub fn build_file_name(&self, build_file: &str) -> Option<&str> {
        let build_file = self.build_file(build_file)?;
        if let Some(file_ref) = &build_file.file_ref {
            return self.file_name(file_ref);
        }
        self.product_name(build_file.product_ref.as_deref()?)
    }

    /// Product name of a Swift package product dependency
    pub fn product_name(&self, reference: &str) -> Option<&str> {
        self.package_product(reference).map(|p| p.product_name.as_str())
    }

    /// `XCRemoteSwiftPackageReference "<name>"` for a package reference
    pub fn package_comment(&self, reference: &str) -> Option<String> {
        let package = self.remote_package(reference)?;
        Some(format!(
            "{} \"{}\"",
            ObjectKind::RemoteSwiftPackageReference.isa(),
            package.name().unwrap_or_default()
        ))
    }

    /// Display name of a build phase
    pub fn build_phase_name(&self, reference: &str) -> Option<&str> {
        self.get(reference)?.build_phase_name()
    }

    /// The phase whose `files` list contains `build_file`
    pub fn build_phase_of_file(&self, build_file: &str) -> Option<(&Reference, &Object)> {
        self.build_phases().find(|(_, object)| {
            object
                .as_build_phase()
                .is_some_and(|phase| phase.files.iter().any(|f| f == build_file))
        })
    }

    /// `<file> in <phase>` when the owning phase is known
    pub fn build_file_comment(&self, build_file: &str) -> Option<String> {
        let (_, phase) = self.build_phase_of_file(build_file)?;
        let phase_name = phase.build_phase_name()?;
        let file_name = self.build_file_name(build_file).unwrap_or("(null)");
        Some(format!("{file_name} in {phase_name}"))
    }

    /// Name of a build configuration
    pub fn config_name(&self, reference: &str) -> Option<&str> {
        self.build_configuration(reference).map(|c| c.name.as_str())
    }

    /// Kind and name of the project or target owning a configuration list
    pub fn object_with_configuration_list(&self, list: &str) -> Option<(ObjectKind, &str)> {
        if let Some((_, project)) = self
            .projects()
            .find(|(_, p)| p.build_configuration_list == list)
        {
            return Some((ObjectKind::Project, project.name.as_str()));
        }
        self.iter().find_map(|(_, object)| {
            let target = object.as_target()?;
            (target.build_configuration_list.as_deref() == Some(list))
                .then(|| (object.kind(), target.name.as_str()))
        })
    }
}

// Queries

impl Objects {
    /// Targets of any kind with the given name
    pub fn targets_named(&self, name: &str) -> Vec<(&Reference, &Target)> {
        self.targets().filter(|(_, t)| t.name == name).collect()
    }

    /// First sources phase listed in the target's build phases
    pub fn sources_build_phase(&self, target: &Target) -> Option<(&Reference, &SourcesBuildPhase)> {
        target
            .build_phases
            .iter()
            .find_map(|reference| match self.entry(reference)? {
                (key, Object::SourcesBuildPhase(phase)) => Some((key, phase)),
                _ => None,
            })
    }

    /// File elements compiled by the target's sources phase
    pub fn source_files(&self, target: &Target) -> Vec<(&Reference, &FileElement)> {
        let Some((_, phase)) = self.sources_build_phase(target) else {
            return Vec::new();
        };
        phase
            .phase
            .files
            .iter()
            .filter_map(|build_file| self.build_file(build_file)?.file_ref.as_ref())
            .filter_map(|file_ref| {
                let (key, object) = self.entry(file_ref)?;
                Some((key, object.as_file_element()?))
            })
            .collect()
    }

    /// Plain group among the children of `in_group` whose name or path is `name`
    pub fn group_named(&self, name: &str, in_group: &str) -> Option<(&Reference, &Group)> {
        let children = self.get(in_group)?.children()?;
        children.iter().find_map(|child| match self.entry(child)? {
            (key, Object::Group(group)) => {
                let matches = group.element.name.as_deref() == Some(name)
                    || group.element.path.as_deref() == Some(name);
                matches.then_some((key, group))
            }
            _ => None,
        })
    }

    /// Group-like node listing `element` among its children
    pub fn parent_group(&self, element: &str) -> Option<&Reference> {
        self.group_likes()
            .find(|(_, object)| {
                object
                    .children()
                    .is_some_and(|children| children.iter().any(|c| c == element))
            })
            .map(|(reference, _)| reference)
    }

    /// Resolve the on-disk path of a file element.
    ///
    /// `None` for elements relative to anything other than `<absolute>`,
    /// `SOURCE_ROOT` or `<group>`, for elements without a needed path, and
    /// for group cycles.
    pub fn full_path(&self, element: &str, source_root: &Path) -> Option<PathBuf> {
        let mut visited = HashSet::new();
        self.full_path_inner(element, source_root, &mut visited)
    }

    fn full_path_inner<'a>(
        &'a self,
        element: &'a str,
        source_root: &Path,
        visited: &mut HashSet<&'a str>,
    ) -> Option<PathBuf> {
        if !visited.insert(element) {
            return None;
        }
        let file_element = self.file_element(element)?;
        match file_element.source_tree.as_ref()? {
            SourceTree::Absolute => file_element.path.as_deref().map(PathBuf::from),
            SourceTree::SourceRoot => file_element
                .path
                .as_deref()
                .map(|path| join_normalized(source_root, path)),
            SourceTree::Group => {
                let base = match self.parent_group(element) {
                    Some(parent) => self.full_path_inner(parent, source_root, visited)?,
                    None => source_root.to_path_buf(),
                };
                match file_element.path.as_deref() {
                    Some(path) => Some(join_normalized(&base, path)),
                    None => Some(base),
                }
            }
            _ => None,
        }
    }
}

// Edits

impl Objects {
    /// Add a (possibly nested, `/`-separated) group path under `to_group`.
    ///
    /// Existing groups matching a segment by name or path are reused. Returns
    /// every group on the path, new or existing, in order.
    pub fn add_group(
        &mut self,
        name: &str,
        to_group: &str,
        options: GroupAddingOptions,
    ) -> Result<Vec<(Reference, Group)>> {
        if self.group_like(to_group).is_none() {
            return Err(ProjError::GroupNotFound(Reference::from(to_group)));
        }

        let mut chain = Vec::new();
        let mut parent = Reference::from(to_group);
        for segment in name.split('/').filter(|s| !s.is_empty()) {
            let reference = self.create_or_get_group(segment, &parent, options);
            chain.push(reference.clone());
            parent = reference;
        }

        Ok(chain
            .into_iter()
            .filter_map(|reference| {
                let group = self.group(&reference)?.clone();
                Some((reference, group))
            })
            .collect())
    }

    fn create_or_get_group(
        &mut self,
        name: &str,
        parent: &Reference,
        options: GroupAddingOptions,
    ) -> Reference {
        if let Some((existing, _)) = self.group_named(name, parent) {
            return existing.clone();
        }

        let path = (!options.without_folder).then(|| name.to_string());
        let group = Group::new(Some(name.to_string()), path);
        let reference = self.generate_reference(ObjectKind::Group, name);
        self.add(group, reference.clone());
        if let Some(children) = self.get_mut(parent).and_then(Object::children_mut) {
            children.push(reference.clone());
        }
        debug!(group = %reference, name, parent = %parent, "Created group");
        reference
    }

    /// Add the file at `path` to `to_group`, or reuse the file reference that
    /// already resolves to the same location.
    pub fn add_file(
        &mut self,
        path: &Path,
        to_group: &str,
        source_tree: SourceTree,
        source_root: &Path,
    ) -> Result<Reference> {
        if !path.exists() {
            return Err(ProjError::FileNotFound(path.to_path_buf()));
        }
        if self.group_like(to_group).is_none() {
            return Err(ProjError::GroupNotFound(Reference::from(to_group)));
        }

        let file_path = absolute(path)?;
        let group_path = self.full_path(to_group, source_root);

        let existing = self
            .file_references()
            .map(|(reference, _)| reference)
            .find(|reference| self.full_path(reference, source_root).as_deref() == Some(file_path.as_path()))
            .cloned();
        if let Some(existing) = existing {
            let in_group = self
                .get(to_group)
                .and_then(Object::children)
                .is_some_and(|children| children.contains(&existing));
            if !in_group {
                let relative = group_path
                    .as_deref()
                    .map(|base| relative_to(&file_path, base).to_string_lossy().into_owned());
                if let Some(file) = self.file_reference_mut(&existing) {
                    file.element.path = relative;
                }
                self.append_child(to_group, &existing);
            }
            debug!(file = %existing, "Reused existing file reference");
            return Ok(existing);
        }

        let stored_path = match source_tree {
            SourceTree::Group => group_path.as_deref().map(|base| relative_to(&file_path, base)),
            SourceTree::SourceRoot => Some(relative_to(&file_path, source_root)),
            SourceTree::Absolute => Some(file_path.clone()),
            _ => None,
        };
        let name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let mut file = FileReference::new(FileElement::new(
            source_tree,
            stored_path.map(|p| p.to_string_lossy().into_owned()),
            name,
        ));
        file.last_known_file_type = last_known_file_type(&file_path).map(str::to_string);

        let reference = self.generate_reference(ObjectKind::FileReference, &file_path.to_string_lossy());
        self.add(file, reference.clone());
        self.append_child(to_group, &reference);
        debug!(file = %reference, path = %file_path.display(), "Added file reference");
        Ok(reference)
    }

    /// Add `file` to the target's sources phase, reusing an existing build
    /// file for it. `Ok(None)` when the target has no sources phase.
    pub fn add_build_file(&mut self, target: &str, file: &str) -> Result<Option<Reference>> {
        let target_object = self
            .target(target)
            .ok_or_else(|| ProjError::TargetNotFound(Reference::from(target)))?;
        let Some((phase, _)) = self.sources_build_phase(target_object) else {
            return Ok(None);
        };
        let phase = phase.clone();

        if let Some((existing, _)) = self
            .build_files()
            .find(|(_, build_file)| build_file.file_ref.as_deref() == Some(file))
        {
            return Ok(Some(existing.clone()));
        }

        let reference = self.generate_reference(ObjectKind::BuildFile, file);
        self.add(BuildFile::new(Reference::from(file)), reference.clone());
        if let Some(sources) = self.sources_phase_mut(&phase) {
            sources.phase.files.push(reference.clone());
        }
        debug!(build_file = %reference, phase = %phase, "Added build file");
        Ok(Some(reference))
    }

    fn append_child(&mut self, group: &str, child: &Reference) {
        if let Some(children) = self.get_mut(group).and_then(Object::children_mut) {
            if !children.contains(child) {
                children.push(child.clone());
            }
        }
    }
}

/// Make `path` absolute against the current directory and normalize it
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        Ok(normalize(&std::env::current_dir()?.join(path)))
    }
}

/// `base` joined with `path` unless `path` is absolute, lexically normalized
fn join_normalized(base: &Path, path: &str) -> PathBuf {
    normalize(&base.join(path))
}

/// Collapse `.` and `..` components without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` expressed relative to `base`, walking up with `..` as needed
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();
    let common = path_components
        .iter()
        .zip(base_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &path_components[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{NativeTarget, ProductType};
    use pretty_assertions::assert_eq;

    /// main group `G_MAIN` (no path) > `Sources` (path Sources) > `main.swift`
    fn sample() -> Objects {
        let mut objects = Objects::new();
        let mut main = Group::new(None, None);
        main.children.push(Reference::from("G_SRC"));
        objects.add(main, "G_MAIN");

        let mut sources = Group::new(Some("Sources".into()), Some("Sources".into()));
        sources.children.push(Reference::from("FR_MAIN"));
        objects.add(sources, "G_SRC");

        let file = FileReference::new(FileElement::new(
            SourceTree::Group,
            Some("main.swift".into()),
            None,
        ));
        objects.add(file, "FR_MAIN");
        objects
    }

    #[test]
    fn test_full_path_through_groups() {
        let objects = sample();
        assert_eq!(
            objects.full_path("FR_MAIN", Path::new("/repo")),
            Some(PathBuf::from("/repo/Sources/main.swift"))
        );
        assert_eq!(
            objects.full_path("G_MAIN", Path::new("/repo")),
            Some(PathBuf::from("/repo"))
        );
    }

    #[test]
    fn test_full_path_other_trees() {
        let mut objects = Objects::new();
        objects.add(
            FileReference::new(FileElement::new(SourceTree::Absolute, Some("/abs/x.h".into()), None)),
            "A",
        );
        objects.add(
            FileReference::new(FileElement::new(SourceTree::SourceRoot, Some("Res/../y.png".into()), None)),
            "S",
        );
        objects.add(
            FileReference::new(FileElement::new(SourceTree::BuildProductsDir, Some("App.app".into()), None)),
            "B",
        );
        let root = Path::new("/repo");
        assert_eq!(objects.full_path("A", root), Some(PathBuf::from("/abs/x.h")));
        assert_eq!(objects.full_path("S", root), Some(PathBuf::from("/repo/y.png")));
        assert_eq!(objects.full_path("B", root), None);
    }

    #[test]
    fn test_full_path_terminates_on_cycles() {
        let mut objects = Objects::new();
        let mut a = Group::new(Some("a".into()), Some("a".into()));
        a.children.push(Reference::from("B"));
        let mut b = Group::new(Some("b".into()), Some("b".into()));
        b.children.push(Reference::from("A"));
        objects.add(a, "A");
        objects.add(b, "B");
        assert_eq!(objects.full_path("A", Path::new("/repo")), None);
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/repo/Sources/App/main.swift"), Path::new("/repo/Sources")),
            PathBuf::from("App/main.swift")
        );
        assert_eq!(
            relative_to(Path::new("/repo/Tests/a.swift"), Path::new("/repo/Sources")),
            PathBuf::from("../Tests/a.swift")
        );
    }

    #[test]
    fn test_add_group_creates_chain_and_is_idempotent() {
        let mut objects = sample();
        let chain = objects
            .add_group("Sources/Feature/Views", "G_MAIN", GroupAddingOptions::default())
            .unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].0, "G_SRC");
        assert_eq!(chain[1].1.element.name.as_deref(), Some("Feature"));
        assert_eq!(chain[1].1.element.path.as_deref(), Some("Feature"));
        assert!(chain[1].1.children.contains(&chain[2].0));
        let count = objects.len();

        let again = objects
            .add_group("Sources/Feature/Views", "G_MAIN", GroupAddingOptions::default())
            .unwrap();
        let first: Vec<_> = chain.iter().map(|(r, _)| r.clone()).collect();
        let second: Vec<_> = again.iter().map(|(r, _)| r.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(objects.len(), count);
    }

    #[test]
    fn test_add_group_without_folder() {
        let mut objects = sample();
        let chain = objects
            .add_group("Virtual", "G_MAIN", GroupAddingOptions::WITHOUT_FOLDER)
            .unwrap();
        assert_eq!(chain[0].1.element.path, None);
        assert_eq!(chain[0].1.element.source_tree, Some(SourceTree::Group));
    }

    #[test]
    fn test_add_group_to_missing_group() {
        let mut objects = sample();
        let err = objects
            .add_group("X", "NOPE", GroupAddingOptions::default())
            .unwrap_err();
        assert!(matches!(err, ProjError::GroupNotFound(_)));
    }

    #[test]
    fn test_add_file_relative_to_group() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Sources/Feature")).unwrap();
        std::fs::write(root.join("Sources/Feature/View.swift"), "").unwrap();

        let mut objects = sample();
        let reference = objects
            .add_file(&root.join("Sources/Feature/View.swift"), "G_SRC", SourceTree::Group, root)
            .unwrap();
        let file = objects.file_reference(&reference).unwrap();
        assert_eq!(file.element.path.as_deref(), Some("Feature/View.swift"));
        assert_eq!(file.element.name.as_deref(), Some("View.swift"));
        assert_eq!(file.last_known_file_type.as_deref(), Some("sourcecode.swift"));
        assert!(objects.group("G_SRC").unwrap().children.contains(&reference));

        let again = objects
            .add_file(&root.join("Sources/Feature/View.swift"), "G_SRC", SourceTree::Group, root)
            .unwrap();
        assert_eq!(again, reference);
        assert_eq!(
            objects
                .group("G_SRC")
                .unwrap()
                .children
                .iter()
                .filter(|c| **c == reference)
                .count(),
            1
        );
    }

    #[test]
    fn test_add_file_source_root_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("Info.plist"), "").unwrap();

        let mut objects = sample();
        let reference = objects
            .add_file(&root.join("Info.plist"), "G_MAIN", SourceTree::SourceRoot, root)
            .unwrap();
        assert_eq!(
            objects.file_reference(&reference).unwrap().element.path.as_deref(),
            Some("Info.plist")
        );

        let err = objects
            .add_file(&root.join("missing.swift"), "G_MAIN", SourceTree::Group, root)
            .unwrap_err();
        assert!(matches!(err, ProjError::FileNotFound(_)));
    }

    #[test]
    fn test_add_build_file_and_queries() {
        let mut objects = sample();
        objects.add(SourcesBuildPhase::default(), "SBP_1");
        let mut target = NativeTarget::new("App", ProductType::Application);
        target.base.build_phases.push(Reference::from("SBP_1"));
        objects.add(target, "NT_1");

        let build_file = objects.add_build_file("NT_1", "FR_MAIN").unwrap().unwrap();
        assert_eq!(objects.add_build_file("NT_1", "FR_MAIN").unwrap(), Some(build_file.clone()));
        assert_eq!(objects.sources_phase("SBP_1").unwrap().phase.files, vec![build_file.clone()]);

        assert_eq!(
            objects.build_file_comment(&build_file).as_deref(),
            Some("main.swift in Sources")
        );
        let target = objects.target("NT_1").unwrap();
        let files = objects.source_files(target);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "FR_MAIN");
        assert_eq!(objects.targets_named("App").len(), 1);
        assert!(objects.targets_named("Other").is_empty());
    }

    #[test]
    fn test_add_build_file_without_sources_phase() {
        let mut objects = sample();
        objects.add(NativeTarget::new("Tool", ProductType::CommandLineTool), "NT_1");
        assert_eq!(objects.add_build_file("NT_1", "FR_MAIN").unwrap(), None);
        assert!(matches!(
            objects.add_build_file("NT_X", "FR_MAIN").unwrap_err(),
            ProjError::TargetNotFound(_)
        ));
    }

    #[test]
    fn test_group_named_matches_name_or_path() {
        let objects = sample();
        assert!(objects.group_named("Sources", "G_MAIN").is_some());
        assert!(objects.group_named("Missing", "G_MAIN").is_none());
        assert_eq!(objects.parent_group("FR_MAIN").map(Reference::as_str), Some("G_SRC"));
    }
}
