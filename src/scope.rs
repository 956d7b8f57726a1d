use crate::error::ScopeError;
use crate::model::ClusterId;

/// Where new declarations currently attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Directly under the diagram, outside any cluster.
    Root,
    Cluster(ClusterId),
}

/// LIFO tracking of the open diagram and its nested clusters.
///
/// Scopes must close in exact reverse order of opening. Every violation is
/// reported at the offending call rather than silently reordered.
#[derive(Debug, Default)]
pub struct ScopeStack {
    diagram_open: bool,
    clusters: Vec<ClusterId>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_diagram(&mut self) -> Result<(), ScopeError> {
        if self.diagram_open {
            return Err(ScopeError::NestedDiagram);
        }
        self.diagram_open = true;
        Ok(())
    }

    pub fn enter_cluster(&mut self, id: ClusterId) -> Result<(), ScopeError> {
        if !self.diagram_open {
            return Err(ScopeError::NoActiveDiagram);
        }
        self.clusters.push(id);
        Ok(())
    }

    pub fn exit_cluster(&mut self) -> Result<ClusterId, ScopeError> {
        self.clusters.pop().ok_or(ScopeError::NoActiveCluster)
    }

    pub fn exit_diagram(&mut self) -> Result<(), ScopeError> {
        if !self.diagram_open {
            return Err(ScopeError::NoActiveDiagram);
        }
        if !self.clusters.is_empty() {
            return Err(ScopeError::OpenClusters(self.clusters.len()));
        }
        self.diagram_open = false;
        Ok(())
    }

    pub fn current(&self) -> Scope {
        match self.clusters.last() {
            Some(id) => Scope::Cluster(*id),
            None => Scope::Root,
        }
    }

    pub fn depth(&self) -> usize {
        self.clusters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_sequence() {
        let mut stack = ScopeStack::new();
        stack.enter_diagram().unwrap();
        assert_eq!(stack.current(), Scope::Root);
        stack.enter_cluster(ClusterId(0)).unwrap();
        stack.enter_cluster(ClusterId(1)).unwrap();
        assert_eq!(stack.current(), Scope::Cluster(ClusterId(1)));
        assert_eq!(stack.exit_cluster().unwrap(), ClusterId(1));
        assert_eq!(stack.exit_cluster().unwrap(), ClusterId(0));
        stack.exit_diagram().unwrap();
    }

    #[test]
    fn nested_diagram_rejected() {
        let mut stack = ScopeStack::new();
        stack.enter_diagram().unwrap();
        assert!(matches!(
            stack.enter_diagram(),
            Err(ScopeError::NestedDiagram)
        ));
    }

    #[test]
    fn cluster_requires_diagram() {
        let mut stack = ScopeStack::new();
        assert!(matches!(
            stack.enter_cluster(ClusterId(0)),
            Err(ScopeError::NoActiveDiagram)
        ));
    }

    #[test]
    fn unbalanced_cluster_exit_rejected() {
        let mut stack = ScopeStack::new();
        stack.enter_diagram().unwrap();
        assert!(matches!(
            stack.exit_cluster(),
            Err(ScopeError::NoActiveCluster)
        ));
    }

    #[test]
    fn diagram_exit_with_open_clusters_rejected() {
        let mut stack = ScopeStack::new();
        stack.enter_diagram().unwrap();
        stack.enter_cluster(ClusterId(0)).unwrap();
        assert!(matches!(
            stack.exit_diagram(),
            Err(ScopeError::OpenClusters(1))
        ));
    }
}
