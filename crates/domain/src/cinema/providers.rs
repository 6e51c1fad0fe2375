//! Provider companies arranged as a tree.

use std::collections::{HashMap, VecDeque};

use cinema_common::ProviderId;
use serde::{Deserialize, Serialize};

use super::CatalogError;

/// A provider company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    id: ProviderId,
    company_name: String,
    sub_providers: Vec<ProviderId>,
}

impl Provider {
    fn new(id: ProviderId, company_name: String) -> Self {
        Self {
            id,
            company_name,
            sub_providers: Vec::new(),
        }
    }

    /// Returns the provider ID.
    pub fn id(&self) -> ProviderId {
        self.id
    }

    /// Returns the company name.
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// Returns the direct sub-providers, in insertion order.
    pub fn sub_providers(&self) -> &[ProviderId] {
        &self.sub_providers
    }
}

/// Arena of providers keyed by id, rooted at a single provider.
///
/// Nodes are only added under an existing parent and ids are unique, so every
/// node except the root has exactly one parent and the structure is acyclic.
/// Deserialization rebuilds the tree through [`ProviderTree::add_sub_provider`]
/// and rejects input that breaks these rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawProviderTree", into = "RawProviderTree")]
pub struct ProviderTree {
    root: ProviderId,
    nodes: HashMap<ProviderId, Provider>,
}

impl ProviderTree {
    /// Creates a tree containing only the root provider.
    pub fn new(root: ProviderId, company_name: impl Into<String>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(root, Provider::new(root, company_name.into()));
        Self { root, nodes }
    }

    /// Attaches a new provider under `parent`.
    pub fn add_sub_provider(
        &mut self,
        parent: ProviderId,
        id: ProviderId,
        company_name: impl Into<String>,
    ) -> Result<&mut Self, CatalogError> {
        if self.nodes.contains_key(&id) {
            return Err(CatalogError::DuplicateProvider { provider_id: id });
        }

        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or(CatalogError::UnknownProvider { provider_id: parent })?;
        parent_node.sub_providers.push(id);

        self.nodes.insert(id, Provider::new(id, company_name.into()));
        Ok(self)
    }

    /// Returns the root provider ID.
    pub fn root(&self) -> ProviderId {
        self.root
    }

    /// Returns a provider by ID.
    pub fn get(&self, id: ProviderId) -> Option<&Provider> {
        self.nodes.get(&id)
    }

    /// Returns true if the provider is part of this tree.
    pub fn contains(&self, id: ProviderId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the number of providers in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the direct sub-providers of `id`.
    pub fn children(&self, id: ProviderId) -> impl Iterator<Item = &Provider> {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|p| p.sub_providers.iter())
            .filter_map(|child| self.nodes.get(child))
    }

    /// Returns every descendant of `id` in depth-first pre-order, excluding
    /// `id` itself.
    pub fn descendants(&self, id: ProviderId) -> Vec<ProviderId> {
        let mut out = Vec::new();
        let mut stack: Vec<ProviderId> = self
            .nodes
            .get(&id)
            .map(|p| p.sub_providers.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.sub_providers.iter().rev().copied());
            }
        }

        out
    }
}

/// Serialized form of a [`ProviderTree`]: the root id and a flat node list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProviderTree {
    pub root: ProviderId,
    pub nodes: Vec<Provider>,
}

impl From<ProviderTree> for RawProviderTree {
    fn from(mut tree: ProviderTree) -> Self {
        let order = std::iter::once(tree.root).chain(tree.descendants(tree.root));
        let nodes = order.filter_map(|id| tree.nodes.remove(&id)).collect();
        Self {
            root: tree.root,
            nodes,
        }
    }
}

impl TryFrom<RawProviderTree> for ProviderTree {
    type Error = CatalogError;

    fn try_from(raw: RawProviderTree) -> Result<Self, Self::Error> {
        let mut pending = HashMap::with_capacity(raw.nodes.len());
        for node in raw.nodes {
            let provider_id = node.id;
            if pending.insert(provider_id, node).is_some() {
                return Err(CatalogError::DuplicateProvider { provider_id });
            }
        }

        let root = pending
            .remove(&raw.root)
            .ok_or(CatalogError::UnknownProvider {
                provider_id: raw.root,
            })?;
        let mut tree = ProviderTree::new(root.id, root.company_name);
        let mut queue = VecDeque::from([(root.id, root.sub_providers)]);

        while let Some((parent, children)) = queue.pop_front() {
            for child in children {
                // A child already placed means a cycle or a second parent.
                let Some(node) = pending.remove(&child) else {
                    return Err(if tree.contains(child) {
                        CatalogError::DuplicateProvider { provider_id: child }
                    } else {
                        CatalogError::UnknownProvider { provider_id: child }
                    });
                };
                tree.add_sub_provider(parent, node.id, node.company_name)?;
                queue.push_back((node.id, node.sub_providers));
            }
        }

        if let Some(&provider_id) = pending.keys().next() {
            return Err(CatalogError::DetachedProvider { provider_id });
        }

        Ok(tree)
    }
}
