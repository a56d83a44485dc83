use std::fmt::{self, Write};

use log::info;

use crate::util::Stats;

use super::{Geometry, Sphere};

impl Geometry {
    /// Number of renderable spheres, bounding spheres are not counted.
    pub fn sphere_count(&self) -> usize {
        match self {
            Geometry::Sphere(_) => 1,
            Geometry::Group(group) => group.children.iter().map(Geometry::sphere_count).sum(),
        }
    }

    pub fn group_count(&self) -> usize {
        match self {
            Geometry::Sphere(_) => 0,
            Geometry::Group(group) => {
                1 + group.children.iter().map(Geometry::group_count).sum::<usize>()
            }
        }
    }

    /// Depths of all spheres in the tree, the root node being at depth 1.
    pub fn depth_statistics(&self) -> Stats {
        let mut stats = Stats::default();
        self.collect_depths(1, &mut stats);
        stats
    }

    /// Child counts of all groups in the tree.
    pub fn child_count_statistics(&self) -> Stats {
        let mut stats = Stats::default();
        self.collect_child_counts(&mut stats);
        stats
    }

    pub fn print_statistics(&self) {
        info!(
            "{} spheres in {} groups",
            self.sphere_count(),
            self.group_count()
        );
        info!("Sphere depth: {}", self.depth_statistics());
        info!("Group child count: {}", self.child_count_statistics());
    }

    /// Writes an indented dump of the tree, one node per line.
    pub fn write_tree(&self, out: &mut impl Write) -> fmt::Result {
        self.write_recursive(0, out)
    }

    fn collect_depths(&self, depth: usize, stats: &mut Stats) {
        match self {
            Geometry::Sphere(_) => stats.add_sample(depth),
            Geometry::Group(group) => group
                .children
                .iter()
                .for_each(|child| child.collect_depths(depth + 1, stats)),
        }
    }

    fn collect_child_counts(&self, stats: &mut Stats) {
        if let Geometry::Group(group) = self {
            stats.add_sample(group.children.len());
            group
                .children
                .iter()
                .for_each(|child| child.collect_child_counts(stats));
        }
    }

    fn write_recursive(&self, indent: usize, out: &mut impl Write) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Geometry::Sphere(sphere) => writeln!(out, "{prefix}- S {}", format_sphere(sphere)),
            Geometry::Group(group) => {
                writeln!(out, "{prefix}- G {}", format_sphere(&group.bound))?;
                group
                    .children
                    .iter()
                    .try_for_each(|child| child.write_recursive(indent + 1, out))
            }
        }
    }
}

fn format_sphere(sphere: &Sphere) -> String {
    format!(
        "({:.3}, {:.3}, {:.3}) r={:.3}",
        sphere.center.x, sphere.center.y, sphere.center.z, sphere.radius
    )
}
