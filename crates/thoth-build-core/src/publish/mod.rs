//! Publish targets invoked once the manifest carries the new version.
pub mod github;
pub mod npm;
pub mod nuget;

pub use github::GitHubReleasePublisher;
pub use npm::NpmPublisher;
pub use nuget::NugetPublisher;

use crate::errors::Result;
use crate::types::VersionInfo;
use tracing::debug;

/// A side effect that ships a version: registry upload, release record, ...
pub trait Publisher {
    fn publish(&self, info: &VersionInfo) -> Result<()>;
}

impl<F> Publisher for F
where
    F: Fn(&VersionInfo) -> Result<()>,
{
    fn publish(&self, info: &VersionInfo) -> Result<()> {
        self(info)
    }
}

/// Runs publishers one after the other, stopping at the first failure.
#[derive(Default)]
pub struct PublishPipeline {
    steps: Vec<Box<dyn Publisher>>,
}

impl PublishPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then<P: Publisher + 'static>(mut self, publisher: P) -> Self {
        self.steps.push(Box::new(publisher));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Publisher for PublishPipeline {
    fn publish(&self, info: &VersionInfo) -> Result<()> {
        for (idx, step) in self.steps.iter().enumerate() {
            debug!("Publish step {}/{}", idx + 1, self.steps.len());
            step.publish(info)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BuildError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn info() -> VersionInfo {
        VersionInfo {
            version: "1.2.0".into(),
            body: "* Fixed".into(),
        }
    }

    #[test]
    fn pipeline_runs_steps_in_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&calls);
        let second = Rc::clone(&calls);
        let pipeline = PublishPipeline::new()
            .then(move |i: &VersionInfo| -> Result<()> {
                first.borrow_mut().push(format!("pack {}", i.version));
                Ok(())
            })
            .then(move |i: &VersionInfo| -> Result<()> {
                second.borrow_mut().push(format!("release {}", i.version));
                Ok(())
            });

        assert_eq!(pipeline.len(), 2);
        pipeline.publish(&info()).unwrap();
        assert_eq!(*calls.borrow(), ["pack 1.2.0", "release 1.2.0"]);
    }

    #[test]
    fn pipeline_stops_at_first_failure() {
        let reached = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&reached);
        let pipeline = PublishPipeline::new()
            .then(|_: &VersionInfo| -> Result<()> {
                Err(BuildError::Publish("npm publish failed".into()))
            })
            .then(move |_: &VersionInfo| -> Result<()> {
                *flag.borrow_mut() = true;
                Ok(())
            });

        let err = pipeline.publish(&info()).unwrap_err();
        assert!(matches!(err, BuildError::Publish(_)));
        assert!(!*reached.borrow());
    }

    #[test]
    fn empty_pipeline_succeeds() {
        let pipeline = PublishPipeline::new();
        assert!(pipeline.is_empty());
        pipeline.publish(&info()).unwrap();
    }
}
