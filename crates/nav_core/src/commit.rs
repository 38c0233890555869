use crate::dirty::compute_dirty;
use crate::machine::{Committed, Env, Machine, Phase};
use bus::NavCommand;
use card_codec::{Document, fingerprint, to_location_preserving};
use core_types::{DatasetTab, EditorMode, ModeState, ObjectId};
use location::{path_for_mode, resolve_mode, same_url};

/// A request to record the current document in history.
///
/// Every field is optional; unset fields fall back to the machine's current
/// document, the computed dirty flag, the policy-chosen write and the
/// current mode. `object_id` is authoritative: `None` means no focused row.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitRequest {
    pub document: Option<Document>,
    pub dirty: Option<bool>,
    pub replace: Option<bool>,
    pub preserve_params: bool,
    pub extra_params: Vec<(String, String)>,
    pub mode: Option<EditorMode>,
    pub tab: Option<DatasetTab>,
    pub object_id: Option<ObjectId>,
}

impl Default for CommitRequest {
    fn default() -> Self {
        Self {
            document: None,
            dirty: None,
            replace: None,
            preserve_params: true,
            extra_params: Vec::new(),
            mode: None,
            tab: None,
            object_id: None,
        }
    }
}

impl CommitRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(document: Document) -> Self {
        Self {
            document: Some(document),
            ..Self::default()
        }
    }

    pub fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = Some(dirty);
        self
    }

    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = Some(replace);
        self
    }

    pub fn preserve_params(mut self, preserve: bool) -> Self {
        self.preserve_params = preserve;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.push((key.into(), value.into()));
        self
    }

    pub fn mode(mut self, mode: EditorMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn tab(mut self, tab: DatasetTab) -> Self {
        self.tab = Some(tab);
        self
    }

    pub fn focus(mut self, object_id: Option<ObjectId>) -> Self {
        self.object_id = object_id;
        self
    }

    fn mode_state(&self, current: ModeState) -> ModeState {
        let mode = self.mode.unwrap_or(current.mode);
        let tab = self.tab.unwrap_or(current.tab);
        ModeState::new(mode, tab)
    }
}

impl Machine {
    pub(crate) fn on_commit(&mut self, env: &Env<'_>, request: CommitRequest, commands: &mut Vec<NavCommand>) {
        let mode = request.mode_state(self.mode);
        let focus = request.object_id.clone();
        let document = request
            .document
            .clone()
            .unwrap_or_else(|| self.document.clone())
            .with_focus(focus.clone());

        // Parameters never silently drop out of the URL.
        let dirty = request
            .dirty
            .unwrap_or_else(|| compute_dirty(&document, env.original, env.equal))
            || document.has_parameters();

        let preserved = if request.preserve_params && env.config.preserve_query_params {
            env.current_location.search.as_str()
        } else {
            ""
        };
        let mut params: Vec<(String, String)> = Vec::with_capacity(request.extra_params.len());
        for (key, value) in &request.extra_params {
            params.retain(|(k, _)| k != key);
            params.push((key.clone(), value.clone()));
        }

        let mut next = to_location_preserving(
            &document,
            dirty,
            preserved,
            &params,
            focus.as_ref(),
            &env.config.url_options(),
        );
        next.path = path_for_mode(&next.path, mode);

        let same_location = same_url(&next, env.current_location);
        let same_mode = resolve_mode(env.current_location).same_as(&mode);
        let same_card = self
            .committed
            .as_ref()
            .is_some_and(|committed| committed.fingerprint == fingerprint(&document));

        self.committed = Some(Committed::new(&document, &next));
        self.document = document;
        self.mode = mode;
        self.focus = focus;

        if same_location && same_mode {
            log::debug!(target: "qbnav.nav", "commit of card {:?} leaves {next} unchanged", self.document.id);
            self.observed = Some(next);
            return;
        }

        let replace = match request.replace {
            Some(replace) => replace,
            None if self.phase == Phase::Reconciling => true,
            None => env.config.replace_policy.should_replace(same_card, same_mode),
        };
        log::trace!(
            target: "qbnav.nav",
            "commit card {:?} dirty={dirty} -> {} {next}",
            self.document.id,
            if replace { "replace" } else { "push" }
        );

        self.observed = Some(next.clone());
        commands.push(if replace {
            NavCommand::Replace(next)
        } else {
            NavCommand::Push(next)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavConfig;
    use crate::machine::Input;
    use card_codec::decode;
    use core_types::CardId;
    use location::LocationDescriptor;
    use serde_json::json;

    fn started(location: &LocationDescriptor, config: &NavConfig) -> Machine {
        let env = Env::new(location, None, config);
        let started = Machine::start(&env, location.clone()).machine;
        started.step(&env, Input::Settled).machine
    }

    fn written(commands: &[NavCommand]) -> &LocationDescriptor {
        match commands {
            [NavCommand::Push(location)] | [NavCommand::Replace(location)] => location,
            other => panic!("expected a single history write, got {other:?}"),
        }
    }

    #[test]
    fn first_edit_of_a_new_card_pushes_its_token() {
        let config = NavConfig::default();
        let current = LocationDescriptor::new("/question");
        let machine = started(&current, &config);
        let env = Env::new(&current, None, &config);

        let doc = Document::ad_hoc(json!({"query": {"source-table": 1}}));
        let step = machine.step(&env, Input::Commit(CommitRequest::of(doc.clone())));

        assert!(matches!(step.commands.as_slice(), [NavCommand::Push(_)]));
        let location = written(&step.commands);
        assert_eq!(location.path, "/question");
        assert!(decode(&location.hash).unwrap().content_eq(&doc));
    }

    #[test]
    fn saving_a_new_card_replaces_the_entry() {
        let config = NavConfig::default();
        let blank = LocationDescriptor::new("/question");
        let machine = started(&blank, &config);

        let draft = Document::ad_hoc(json!({"query": {"source-table": 1}})).with_name("Orders");
        let env = Env::new(&blank, None, &config);
        let step = machine.step(&env, Input::Commit(CommitRequest::of(draft.clone())));
        let draft_location = written(&step.commands).clone();

        let saved = Document {
            id: Some(CardId::from_raw(42)),
            ..draft
        };
        let env = Env::new(&draft_location, Some(&saved), &config);
        let step = step
            .machine
            .step(&env, Input::Commit(CommitRequest::of(saved.clone())));

        assert!(matches!(step.commands.as_slice(), [NavCommand::Replace(_)]));
        let location = written(&step.commands);
        assert_eq!(location.path, "/question/42-orders");
        assert!(location.hash.is_empty());
    }

    #[test]
    fn commit_to_the_current_url_is_a_no_op() {
        let config = NavConfig::default();
        let saved = Document::saved(CardId::from_raw(7), json!({"query": "A"}));
        let current = LocationDescriptor::new("/question/7");
        let machine = started(&current, &config);
        let env = Env::new(&current, Some(&saved), &config);

        let step = machine.step(&env, Input::Commit(CommitRequest::of(saved.clone())));
        assert!(step.commands.is_empty());
        assert_eq!(step.machine.committed().map(|c| c.card_id), Some(Some(CardId::from_raw(7))));
    }

    #[test]
    fn parameters_force_a_token() {
        let config = NavConfig::default();
        let saved = Document::saved(CardId::from_raw(7), json!({"query": "A"}))
            .with_parameters(vec![json!({"slug": "state"})]);
        let current = LocationDescriptor::new("/question/7");
        let machine = started(&current, &config);
        let env = Env::new(&current, Some(&saved), &config);

        let step = machine.step(&env, Input::Commit(CommitRequest::of(saved.clone())));
        assert!(!written(&step.commands).hash.is_empty());
    }

    #[test]
    fn mode_change_pushes_a_suffixed_path() {
        let config = NavConfig::default();
        let saved = Document::saved(CardId::from_raw(7), json!({"query": "A"}));
        let current = LocationDescriptor::new("/question/7");
        let machine = started(&current, &config);
        let env = Env::new(&current, Some(&saved), &config);

        let request = CommitRequest::of(saved.clone()).mode(EditorMode::Notebook);
        let step = machine.step(&env, Input::Commit(request));

        assert!(matches!(step.commands.as_slice(), [NavCommand::Push(_)]));
        assert_eq!(written(&step.commands).path, "/question/7/notebook");
        assert_eq!(step.machine.mode().mode, EditorMode::Notebook);
    }

    #[test]
    fn query_params_are_preserved_and_overridden() {
        let config = NavConfig::default();
        let current = LocationDescriptor::new("/question").with_search("tab=1&keep=yes");
        let machine = started(&current, &config);
        let env = Env::new(&current, None, &config);

        let request = CommitRequest::of(Document::ad_hoc(json!({"query": "A"}))).param("tab", "2");
        let step = machine.step(&env, Input::Commit(request));
        assert_eq!(written(&step.commands).search, "keep=yes&tab=2");

        let request = CommitRequest::of(Document::ad_hoc(json!({"query": "A"}))).preserve_params(false);
        let step = machine.step(&env, Input::Commit(request));
        assert_eq!(written(&step.commands).search, "");
    }

    #[test]
    fn explicit_replace_wins_over_policy() {
        let config = NavConfig::default();
        let current = LocationDescriptor::new("/question");
        let machine = started(&current, &config);
        let env = Env::new(&current, None, &config);

        let request = CommitRequest::of(Document::ad_hoc(json!({"query": "A"}))).replace(true);
        let step = machine.step(&env, Input::Commit(request));
        assert!(matches!(step.commands.as_slice(), [NavCommand::Replace(_)]));
    }
}
