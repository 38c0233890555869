use crate::config::FocusPopPolicy;
use crate::machine::{Committed, Env, Machine};
use bus::NavCommand;
use card_codec::{Document, decode, object_focus_of};
use core_types::EditorMode;
use location::{CompareOptions, LocationDescriptor, parse_question_path, resolve_mode, same_location};

impl Machine {
    // -- Browser back/forward ---
    pub(crate) fn on_pop(&mut self, env: &Env<'_>, target: LocationDescriptor, commands: &mut Vec<NavCommand>) {
        commands.push(NavCommand::CancelInFlight);

        let had_focus = self.focus.is_some();
        let target_focus = object_focus_of(&target, &env.config.base_path);
        match (self.focus.take(), target_focus) {
            (Some(current), Some(previous)) if current != previous => {
                commands.push(NavCommand::FocusObject(previous.clone()));
                self.focus = Some(previous);
            }
            (Some(_), _) => commands.push(NavCommand::ClearFocus),
            (None, Some(previous)) => {
                commands.push(NavCommand::FocusObject(previous.clone()));
                self.focus = Some(previous);
            }
            (None, None) => {}
        }
        self.document.object_focus = self.focus.clone();

        if had_focus && env.config.focus_pop == FocusPopPolicy::Terminal {
            self.observed = Some(target);
            self.mark_reconciling_if_needed(commands);
            return;
        }

        let url_changed = !self
            .observed
            .as_ref()
            .is_some_and(|observed| same_location(observed, &target, CompareOptions::WITH_MODE));
        self.observed = Some(target.clone());
        if url_changed {
            self.reconcile_document(env, &target, commands);
        }

        let target_mode = resolve_mode(&target);
        if !target_mode.same_as(&self.mode) {
            commands.push(NavCommand::SetMode {
                mode: target_mode,
                url_driven: true,
                update_url: target_mode.mode == EditorMode::DatasetEdit,
            });
            self.mode = target_mode;
        }

        self.mark_reconciling_if_needed(commands);
    }

    fn reconcile_document(&mut self, env: &Env<'_>, target: &LocationDescriptor, commands: &mut Vec<NavCommand>) {
        if target.has_hash() {
            match decode(&target.hash) {
                Ok(mut document) => {
                    document.object_focus = self.focus.clone();
                    if !(env.equal)(&document, &self.document) {
                        log::trace!(target: "qbnav.nav", "pop to {target} replaces the document");
                        self.replace_document(document, commands);
                    }
                    self.committed = Some(Committed::new(&self.document, target));
                }
                Err(err) => {
                    log::warn!(target: "qbnav.nav", "pop to {target}: {err}; reinitializing");
                    commands.push(NavCommand::Reinitialize {
                        location: target.clone(),
                    });
                }
            }
            return;
        }

        let base = &env.config.base_path;
        match parse_question_path(base, &target.path) {
            Some(parsed) if parsed.card_id.is_some() && parsed.card_id == self.document.id => {
                // Back to the clean saved card: drop unsaved edits.
                let original = env.original.filter(|original| original.id == parsed.card_id);
                if let Some(original) = original {
                    if !(env.equal)(&self.document, original) {
                        let mut document = original.clone();
                        document.object_focus = self.focus.clone();
                        self.replace_document(document, commands);
                    }
                }
                self.committed = Some(Committed::new(&self.document, target));
            }
            Some(_) => commands.push(NavCommand::Reinitialize {
                location: target.clone(),
            }),
            None => {
                log::debug!(target: "qbnav.nav", "pop to {target} is outside {base}; document left alone");
            }
        }
    }

    fn replace_document(&mut self, document: Document, commands: &mut Vec<NavCommand>) {
        commands.push(NavCommand::ReplaceDocument {
            document: document.clone(),
            run: true,
        });
        self.document = document;
    }

    // -- Initial load / external link ---
    pub(crate) fn on_initial_load(&mut self, env: &Env<'_>, location: LocationDescriptor, commands: &mut Vec<NavCommand>) {
        commands.push(NavCommand::CancelInFlight);

        let base = &env.config.base_path;
        let focus = object_focus_of(&location, base);
        let mode = resolve_mode(&location);
        self.observed = Some(location.clone());
        self.committed = None;

        let decoded = if location.has_hash() {
            decode(&location.hash)
                .map_err(|err| {
                    log::warn!(target: "qbnav.nav", "initial load of {location}: {err}; using the default document");
                })
                .ok()
        } else {
            None
        };

        match decoded {
            Some(mut document) => {
                document.object_focus = focus.clone();
                self.committed = Some(Committed::new(&document, &location));
                self.replace_document(document, commands);
            }
            None => match parse_question_path(base, &location.path).and_then(|p| p.card_id) {
                Some(id) => {
                    commands.push(NavCommand::LoadSaved { id });
                    self.document = Document {
                        id: Some(id),
                        object_focus: focus.clone(),
                        ..Document::default()
                    };
                }
                None => {
                    let document = Document::default().with_focus(focus.clone());
                    self.committed = Some(Committed::new(&document, &location));
                    commands.push(NavCommand::ReplaceDocument {
                        document: document.clone(),
                        run: false,
                    });
                    self.document = document;
                }
            },
        }

        if focus != self.focus {
            commands.push(match &focus {
                Some(object_id) => NavCommand::FocusObject(object_id.clone()),
                None => NavCommand::ClearFocus,
            });
            self.focus = focus;
        }

        if !mode.same_as(&self.mode) {
            commands.push(NavCommand::SetMode {
                mode,
                url_driven: true,
                update_url: false,
            });
            self.mode = mode;
        }

        self.mark_reconciling_if_needed(commands);
    }
}
