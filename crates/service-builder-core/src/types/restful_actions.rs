use serde::{Deserialize, Serialize};

/// One of the five REST actions a generated service can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestfulAction {
    Index,
    Create,
    Show,
    Update,
    Destroy,
}

impl RestfulAction {
    /// All actions, in canonical order.
    pub const ALL: [RestfulAction; 5] = [
        Self::Index,
        Self::Create,
        Self::Show,
        Self::Update,
        Self::Destroy,
    ];

    /// Looks up an action by its exact (case-sensitive) DSL name.
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == s)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Create => "create",
            Self::Show => "show",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }
}

/// The set of REST actions enabled for a model.
///
/// `Default` is the empty set, which is what an explicit `rest_actions: []`
/// produces. A model with no `actions` block has no `RestfulActions` value;
/// consumers apply [`RestfulActions::all`] in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestfulActions {
    pub index: bool,
    pub create: bool,
    pub show: bool,
    pub update: bool,
    pub destroy: bool,
}

impl RestfulActions {
    /// No actions enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every action enabled: the policy for models without an `actions` block.
    pub fn all() -> Self {
        Self {
            index: true,
            create: true,
            show: true,
            update: true,
            destroy: true,
        }
    }

    /// Enables a single action. Never disables any other.
    pub fn enable(&mut self, action: RestfulAction) {
        *self.flag_mut(action) = true;
    }

    pub fn is_enabled(&self, action: RestfulAction) -> bool {
        match action {
            RestfulAction::Index => self.index,
            RestfulAction::Create => self.create,
            RestfulAction::Show => self.show,
            RestfulAction::Update => self.update,
            RestfulAction::Destroy => self.destroy,
        }
    }

    /// The enabled actions, in canonical order.
    pub fn enabled(&self) -> impl Iterator<Item = RestfulAction> + '_ {
        RestfulAction::ALL
            .into_iter()
            .filter(move |a| self.is_enabled(*a))
    }

    fn flag_mut(&mut self, action: RestfulAction) -> &mut bool {
        match action {
            RestfulAction::Index => &mut self.index,
            RestfulAction::Create => &mut self.create,
            RestfulAction::Show => &mut self.show,
            RestfulAction::Update => &mut self.update,
            RestfulAction::Destroy => &mut self.destroy,
        }
    }
}

impl FromIterator<RestfulAction> for RestfulActions {
    fn from_iter<I: IntoIterator<Item = RestfulAction>>(iter: I) -> Self {
        let mut actions = Self::none();
        for action in iter {
            actions.enable(action);
        }
        actions
    }
}
