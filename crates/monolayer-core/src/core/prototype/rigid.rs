use super::Attachable;
use super::fragment::Fragment;

/// A chain prototype whose geometry is used exactly as given.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidPrototype {
    fragment: Fragment,
}

impl RigidPrototype {
    pub fn new(fragment: Fragment) -> Self {
        Self { fragment }
    }
}

impl Attachable for RigidPrototype {
    fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    fn fragment_mut(&mut self) -> &mut Fragment {
        &mut self.fragment
    }
}
