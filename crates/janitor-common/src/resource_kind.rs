//! Managed cloud resource types
//!
//! Each cleanup unit handles exactly one of these kinds. The orchestrator
//! itself never interprets a kind beyond logging and labeling report buckets.

use serde::{Deserialize, Serialize};

/// Types of cloud resources managed by the janitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// EC2 instance
    Instance,
    /// EBS volume
    EbsVolume,
    /// EBS snapshot
    EbsSnapshot,
    /// Auto scaling group
    Asg,
    /// Launch configuration
    LaunchConfig,
    /// Machine image (AMI)
    Image,
}

impl ResourceKind {
    /// Stable string form used in the database and in report labels
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Instance => "instance",
            ResourceKind::EbsVolume => "ebs-volume",
            ResourceKind::EbsSnapshot => "ebs-snapshot",
            ResourceKind::Asg => "asg",
            ResourceKind::LaunchConfig => "launch-config",
            ResourceKind::Image => "image",
        }
    }

    /// Parse from the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "instance" => Some(ResourceKind::Instance),
            "ebs-volume" => Some(ResourceKind::EbsVolume),
            "ebs-snapshot" => Some(ResourceKind::EbsSnapshot),
            "asg" => Some(ResourceKind::Asg),
            "launch-config" => Some(ResourceKind::LaunchConfig),
            "image" => Some(ResourceKind::Image),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
