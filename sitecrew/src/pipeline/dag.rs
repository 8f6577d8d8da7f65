//! Dependency graph checks over a stage sequence.

use crate::stages::Stage;
use std::collections::{HashMap, HashSet};

/// Read-only dependency view of a stage list.
#[derive(Debug)]
pub struct StageGraph<'a> {
    order: Vec<&'a str>,
    edges: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> StageGraph<'a> {
    /// Builds the graph for `stages`, keeping their order.
    #[must_use]
    pub fn new(stages: &'a [Stage]) -> Self {
        let order = stages.iter().map(|s| s.id.as_str()).collect();
        let edges = stages
            .iter()
            .map(|s| (s.id.as_str(), s.depends_on.iter().map(String::as_str).collect()))
            .collect();
        Self { order, edges }
    }

    /// Returns the first dependency that names no stage in the graph.
    #[must_use]
    pub fn find_missing_dependency(&self) -> Option<(&'a str, &'a str)> {
        self.order.iter().find_map(|&id| {
            self.edges[id]
                .iter()
                .find(|dep| !self.edges.contains_key(*dep))
                .map(|&dep| (id, dep))
        })
    }

    /// Finds a dependency cycle, returned as a path that starts and ends
    /// at the same stage.
    ///
    /// Stages are visited in sequence order, so the reported path is stable.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut path = Vec::new();

        for &id in &self.order {
            if !visited.contains(id) {
                if let Some(cycle) = self.dfs_cycle(id, &mut visited, &mut on_stack, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn dfs_cycle(
        &self,
        node: &'a str,
        visited: &mut HashSet<&'a str>,
        on_stack: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        visited.insert(node);
        on_stack.insert(node);
        path.push(node);

        for &dep in self.edges.get(node).map(Vec::as_slice).unwrap_or_default() {
            if on_stack.contains(dep) {
                let start = path.iter().position(|n| *n == dep).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|s| (*s).to_string()).collect();
                cycle.push(dep.to_string());
                return Some(cycle);
            }
            if !visited.contains(dep) && self.edges.contains_key(dep) {
                if let Some(cycle) = self.dfs_cycle(dep, visited, on_stack, path) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        on_stack.remove(node);
        None
    }

    /// Returns the first stage that depends on a stage scheduled at or
    /// after it, as `(stage, dependency)`.
    #[must_use]
    pub fn find_forward_reference(&self) -> Option<(&'a str, &'a str)> {
        let position: HashMap<&str, usize> = self.order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        self.order.iter().enumerate().find_map(|(i, &id)| {
            self.edges[id]
                .iter()
                .find(|dep| position.get(*dep).is_some_and(|&p| p >= i))
                .map(|&dep| (id, dep))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use std::sync::Arc;

    fn stage(id: &str, deps: &[&str]) -> Stage {
        let role = Arc::new(Role::new("Tester", "test", "You test."));
        Stage::new(id, role, "task").with_dependencies(deps.iter().copied())
    }

    #[test]
    fn test_acyclic_graph() {
        let stages = vec![stage("a", &[]), stage("b", &["a"]), stage("c", &["a", "b"])];
        let graph = StageGraph::new(&stages);

        assert!(graph.find_cycle().is_none());
        assert!(graph.find_missing_dependency().is_none());
        assert!(graph.find_forward_reference().is_none());
    }

    #[test]
    fn test_cycle_path() {
        let stages = vec![stage("a", &["c"]), stage("b", &["a"]), stage("c", &["b"])];
        let graph = StageGraph::new(&stages);

        assert_eq!(graph.find_cycle().unwrap(), vec!["a", "c", "b", "a"]);
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let stages = vec![stage("a", &["a"])];
        assert_eq!(StageGraph::new(&stages).find_cycle().unwrap(), vec!["a", "a"]);
    }

    #[test]
    fn test_missing_dependency() {
        let stages = vec![stage("a", &[]), stage("b", &["ghost"])];
        assert_eq!(StageGraph::new(&stages).find_missing_dependency(), Some(("b", "ghost")));
    }

    #[test]
    fn test_forward_reference() {
        let stages = vec![stage("b", &["a"]), stage("a", &[])];
        assert_eq!(StageGraph::new(&stages).find_forward_reference(), Some(("b", "a")));
    }
}
