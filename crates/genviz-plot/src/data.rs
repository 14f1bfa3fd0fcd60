//! Dot-plot input data.
//!
//! A plot compares a query chromosome against a reference track: each
//! gene carries its position on both axes. Types deserialize directly
//! from the JSON the data services emit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One gene: its identifiers and its position on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotGene {
    /// Unique gene name.
    pub name: String,
    /// Family the gene belongs to; empty when unassigned.
    #[serde(default)]
    pub family: String,
    /// Position along the reference axis, in base pairs.
    pub x: f64,
    /// Position along the query axis, in base pairs.
    pub y: f64,
}

/// The dataset one dot plot renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    /// Reference track name, drawn as the horizontal axis label.
    pub reference_name: String,
    /// Query chromosome name, drawn as the vertical axis label.
    pub chromosome_name: String,
    /// The genes to plot.
    pub genes: Vec<PlotGene>,
}

impl PlotData {
    /// Index of a gene by name.
    pub fn gene_index(&self, name: &str) -> Option<usize> {
        self.genes.iter().position(|g| g.name == name)
    }
}

/// Axis-aligned extent of a set of genes, in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PlotBounds {
    /// An empty accumulator; `update` grows it gene by gene.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Grow the bounds to include a gene.
    pub fn update(&mut self, gene: &PlotGene) {
        self.min_x = self.min_x.min(gene.x);
        self.max_x = self.max_x.max(gene.x);
        self.min_y = self.min_y.min(gene.y);
        self.max_y = self.max_y.max(gene.y);
    }

    /// Whether at least one gene was folded in.
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Bounds of a gene list. Invalid when the list is empty.
    pub fn from_genes(genes: &[PlotGene]) -> Self {
        let mut bounds = Self::empty();
        for gene in genes {
            bounds.update(gene);
        }
        bounds
    }

    /// Whether a gene lies inside (edges inclusive).
    pub fn contains(&self, gene: &PlotGene) -> bool {
        gene.x >= self.min_x && gene.x <= self.max_x && gene.y >= self.min_y && gene.y <= self.max_y
    }
}

/// Family-to-color lookup shared by all the viewers on a page, so the
/// same family renders in the same color everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyColors {
    colors: HashMap<String, String>,
}

impl FamilyColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a color to a family.
    pub fn assign(&mut self, family: impl Into<String>, color: impl Into<String>) {
        self.colors.insert(family.into(), color.into());
    }

    /// The color for a family, if one is assigned.
    pub fn color(&self, family: &str) -> Option<&str> {
        self.colors.get(family).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

impl<F: Into<String>, C: Into<String>> FromIterator<(F, C)> for FamilyColors {
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        Self {
            colors: iter
                .into_iter()
                .map(|(f, c)| (f.into(), c.into()))
                .collect(),
        }
    }
}
