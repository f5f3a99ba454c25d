//! The object store: every node of a project graph, keyed by reference
//!
//! Nodes live in one sub-collection per [`ObjectKind`]. Polymorphic lookups
//! probe the sub-collections in [`ObjectKind::LOOKUP_ORDER`] and return the
//! first hit; typed getters look at a single kind or a fixed union of kinds.

use crate::objects::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, FileElement, FileReference,
    Group, NativeTarget, Object, ObjectKind, Project, RemoteSwiftPackageReference,
    SourcesBuildPhase, SwiftPackageProductDependency, Target,
};
use crate::reference::Reference;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Length budget of a generated reference, acronym and separator included
const REFERENCE_LENGTH: usize = 16;

/// Typed multi-collection of project graph nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objects {
    collections: BTreeMap<ObjectKind, BTreeMap<Reference, Object>>,
}

macro_rules! typed_access {
    ($($variant:ident: $all:ident, $one:ident, $one_mut:ident;)*) => {
        $(
            pub fn $all(&self) -> impl Iterator<Item = (&Reference, &$variant)> {
                self.of_kind(ObjectKind::$variant).filter_map(|(reference, object)| match object {
                    Object::$variant(inner) => Some((reference, inner)),
                    _ => None,
                })
            }

            pub fn $one(&self, reference: &str) -> Option<&$variant> {
                match self.collections.get(&ObjectKind::$variant)?.get(reference)? {
                    Object::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            pub fn $one_mut(&mut self, reference: &str) -> Option<&mut $variant> {
                match self.collections.get_mut(&ObjectKind::$variant)?.get_mut(reference)? {
                    Object::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        )*
    };
}

impl Objects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `reference` into the sub-collection of its kind.
    ///
    /// A reference names at most one node: a node of another kind stored
    /// under the same reference is removed. Returns the node that was
    /// replaced, if any.
    pub fn add(&mut self, object: impl Into<Object>, reference: impl Into<Reference>) -> Option<Object> {
        let object = object.into();
        let reference = reference.into();
        let kind = object.kind();

        let mut displaced = None;
        for (other, collection) in self.collections.iter_mut() {
            if *other != kind {
                displaced = collection.remove(&reference).or(displaced);
            }
        }
        self.collections.retain(|_, collection| !collection.is_empty());

        let replaced = self
            .collections
            .entry(kind)
            .or_default()
            .insert(reference, object);
        replaced.or(displaced)
    }

    /// Polymorphic lookup; never fails, absent references give `None`
    pub fn get(&self, reference: &str) -> Option<&Object> {
        ObjectKind::LOOKUP_ORDER
            .iter()
            .find_map(|kind| self.collections.get(kind)?.get(reference))
    }

    /// Like [`Objects::get`], also returning the stored key
    pub fn entry(&self, reference: &str) -> Option<(&Reference, &Object)> {
        ObjectKind::LOOKUP_ORDER
            .iter()
            .find_map(|kind| self.collections.get(kind)?.get_key_value(reference))
    }

    pub fn get_mut(&mut self, reference: &str) -> Option<&mut Object> {
        let kind = ObjectKind::LOOKUP_ORDER.iter().copied().find(|kind| {
            self.collections
                .get(kind)
                .is_some_and(|collection| collection.contains_key(reference))
        })?;
        self.collections.get_mut(&kind)?.get_mut(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.get(reference).is_some()
    }

    /// Remove the node `get` would return. Edges pointing at it are kept.
    pub fn remove(&mut self, reference: &str) -> Option<Object> {
        let kind = self.get(reference)?.kind();
        let collection = self.collections.get_mut(&kind)?;
        let removed = collection.remove(reference);
        if collection.is_empty() {
            self.collections.remove(&kind);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.collections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every node, grouped by kind in section order, sorted by reference
    pub fn iter(&self) -> impl Iterator<Item = (&Reference, &Object)> {
        self.collections.values().flat_map(|collection| collection.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Reference, &mut Object)> {
        self.collections
            .values_mut()
            .flat_map(|collection| collection.iter_mut())
    }

    /// Nodes of a single kind, sorted by reference
    pub fn of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = (&Reference, &Object)> {
        self.collections
            .get(&kind)
            .into_iter()
            .flat_map(|collection| collection.iter())
    }

    /// Number of nodes of a kind
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.collections.get(&kind).map_or(0, BTreeMap::len)
    }

    typed_access! {
        BuildConfiguration: build_configurations, build_configuration, build_configuration_mut;
        BuildFile: build_files, build_file, build_file_mut;
        ConfigurationList: configuration_lists, configuration_list, configuration_list_mut;
        FileReference: file_references, file_reference, file_reference_mut;
        Group: groups, group, group_mut;
        NativeTarget: native_targets, native_target, native_target_mut;
        Project: projects, project, project_mut;
        RemoteSwiftPackageReference: remote_packages, remote_package, remote_package_mut;
        SourcesBuildPhase: sources_phases, sources_phase, sources_phase_mut;
        SwiftPackageProductDependency: package_products, package_product, package_product_mut;
    }

    /// Shared attributes of a native, legacy or aggregate target
    pub fn target(&self, reference: &str) -> Option<&Target> {
        self.get(reference)?.as_target()
    }

    pub fn target_mut(&mut self, reference: &str) -> Option<&mut Target> {
        self.get_mut(reference)?.as_target_mut()
    }

    /// All targets of every kind
    pub fn targets(&self) -> impl Iterator<Item = (&Reference, &Target)> {
        self.iter()
            .filter_map(|(reference, object)| object.as_target().map(|t| (reference, t)))
    }

    /// File element attributes of a file reference or any group kind
    pub fn file_element(&self, reference: &str) -> Option<&FileElement> {
        self.get(reference)?.as_file_element()
    }

    /// A group, variant group or version group
    pub fn group_like(&self, reference: &str) -> Option<&Object> {
        self.get(reference).filter(|object| object.kind().is_group_like())
    }

    /// Every group-like node
    pub fn group_likes(&self) -> impl Iterator<Item = (&Reference, &Object)> {
        self.iter().filter(|(_, object)| object.kind().is_group_like())
    }

    /// Shared attributes of any build phase kind
    pub fn build_phase(&self, reference: &str) -> Option<&BuildPhase> {
        self.get(reference)?.as_build_phase()
    }

    /// Every build phase of every kind
    pub fn build_phases(&self) -> impl Iterator<Item = (&Reference, &Object)> {
        self.iter().filter(|(_, object)| object.kind().is_build_phase())
    }

    /// Fresh reference for a node of `kind`, derived from `seed`.
    ///
    /// The same seed gives the same reference unless it is already taken, in
    /// which case `-1`, `-2`, ... are appended until the candidate is free.
    pub fn generate_reference(&self, kind: ObjectKind, seed: &str) -> Reference {
        let acronym = kind.acronym();
        let digest = Sha256::digest(seed.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let fingerprint = format!("{:020}", u64::from_be_bytes(prefix));
        let width = REFERENCE_LENGTH.saturating_sub(acronym.len() + 2).max(1);
        let digits = &fingerprint[..fingerprint.len().min(width)];

        let base = format!("{acronym}_{digits}");
        let mut candidate = base.clone();
        let mut counter = 0u32;
        while self.contains(&candidate) {
            counter += 1;
            candidate = format!("{base}-{counter}");
        }
        Reference::new(candidate)
    }

    /// Structural edges whose target is not in the store, as
    /// `(owner, attribute, missing reference)`
    pub fn dangling_references(&self) -> Vec<(Reference, &'static str, Reference)> {
        let mut dangling = Vec::new();
        for (owner, object) in self.iter() {
            for (attribute, target) in structural_edges(object) {
                if !self.contains(target) {
                    dangling.push((owner.clone(), attribute, target.clone()));
                }
            }
        }
        dangling
    }
}

/// Edges that must resolve for the graph to be usable
fn structural_edges(object: &Object) -> Vec<(&'static str, &Reference)> {
    let mut edges: Vec<(&'static str, &Reference)> = Vec::new();
    if let Some(children) = object.children() {
        edges.extend(children.iter().map(|c| ("children", c)));
    }
    if let Some(phase) = object.as_build_phase() {
        edges.extend(phase.files.iter().map(|f| ("files", f)));
    }
    if let Some(target) = object.as_target() {
        edges.extend(target.build_phases.iter().map(|p| ("buildPhases", p)));
        edges.extend(target.dependencies.iter().map(|d| ("dependencies", d)));
        edges.extend(target.build_configuration_list.iter().map(|l| ("buildConfigurationList", l)));
    }
    match object {
        Object::Project(project) => {
            edges.push(("mainGroup", &project.main_group));
            edges.push(("buildConfigurationList", &project.build_configuration_list));
            edges.extend(project.targets.iter().map(|t| ("targets", t)));
        }
        Object::BuildFile(build_file) => {
            edges.extend(build_file.file_ref.iter().map(|f| ("fileRef", f)));
            edges.extend(build_file.product_ref.iter().map(|p| ("productRef", p)));
        }
        Object::ConfigurationList(list) => {
            edges.extend(list.build_configurations.iter().map(|c| ("buildConfigurations", c)));
        }
        _ => {}
    }
    edges
}
