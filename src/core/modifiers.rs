// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Optional search arguments (`nearText`, `hybrid`, `bm25`, ...)
//!
//! Modifier values are opaque JSON. Only presence matters: a present
//! modifier is rendered as `<key>: <literal>`, an absent one is left out.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::error::ConstructionError;
use super::literal;

/// Search modes, declared in their fixed rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierKind {
    NearText,
    NearVector,
    NearImage,
    NearObject,
    Hybrid,
    Bm25,
    Ask,
}

impl ModifierKind {
    pub const ALL: [ModifierKind; 7] = [
        ModifierKind::NearText,
        ModifierKind::NearVector,
        ModifierKind::NearImage,
        ModifierKind::NearObject,
        ModifierKind::Hybrid,
        ModifierKind::Bm25,
        ModifierKind::Ask,
    ];

    /// Argument name in the document
    pub const fn key(self) -> &'static str {
        match self {
            ModifierKind::NearText => "nearText",
            ModifierKind::NearVector => "nearVector",
            ModifierKind::NearImage => "nearImage",
            ModifierKind::NearObject => "nearObject",
            ModifierKind::Hybrid => "hybrid",
            ModifierKind::Bm25 => "bm25",
            ModifierKind::Ask => "ask",
        }
    }

    pub fn parse(key: &str) -> Result<Self, ConstructionError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| ConstructionError::InvalidModifier(key.to_string()))
    }
}

/// The set of present search modifiers for one query
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, JsonValue>")]
pub struct SearchModifiers {
    entries: BTreeMap<ModifierKind, JsonValue>,
}

impl SearchModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{"nearText": {...}, "bm25": {...}}` map; `null` entries count as absent
    pub fn from_json(map: &Map<String, JsonValue>) -> Result<Self, ConstructionError> {
        let mut modifiers = Self::new();
        for (key, value) in map {
            let kind = ModifierKind::parse(key)?;
            if !value.is_null() {
                modifiers.insert(kind, value.clone());
            }
        }
        Ok(modifiers)
    }

    pub fn insert(&mut self, kind: ModifierKind, value: JsonValue) -> Option<JsonValue> {
        self.entries.insert(kind, value)
    }

    pub fn remove(&mut self, kind: ModifierKind) -> Option<JsonValue> {
        self.entries.remove(&kind)
    }

    pub fn get(&self, kind: ModifierKind) -> Option<&JsonValue> {
        self.entries.get(&kind)
    }

    pub fn contains(&self, kind: ModifierKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Present modifiers in rendering order
    pub fn kinds(&self) -> impl Iterator<Item = ModifierKind> + '_ {
        self.entries.keys().copied()
    }

    /// Render each present modifier as a `(key, literal)` argument pair
    pub fn render(&self) -> Result<Vec<(&'static str, String)>, ConstructionError> {
        self.entries
            .iter()
            .map(|(kind, value)| {
                literal::render_modifier(kind.key(), value).map(|rendered| (kind.key(), rendered))
            })
            .collect()
    }
}

impl TryFrom<Map<String, JsonValue>> for SearchModifiers {
    type Error = ConstructionError;

    fn try_from(map: Map<String, JsonValue>) -> Result<Self, Self::Error> {
        Self::from_json(&map)
    }
}
