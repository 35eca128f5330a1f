//! Scene registry: owned mesh actors and the pose operations over them

use crate::actor::MeshActor;
use crate::image_plane::ImagePlane;
use crate::undo::UndoStack;
use log::debug;
use pose6d_core::{Error, MirrorAxis, Pose, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owned registry of mesh actors keyed by name
///
/// Replaces the actor dictionaries and toggled globals of a GUI callback
/// model with one explicit state object. All pose operations of the
/// annotation surface (reset/update ground truth, broadcast, undo, realign,
/// mirror) are methods here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneRegistry {
    actors: BTreeMap<String, MeshActor>,
    reference: Option<String>,
    bindings: BTreeMap<String, Vec<String>>,
    undo: UndoStack,
    image: Option<ImagePlane>,
    /// When set, pose edits anchor on the reference and propagate to all
    /// actors; when cleared, actors move independently
    pub anchored: bool,
    hidden: bool,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self {
            anchored: true,
            ..Self::default()
        }
    }

    /// Insert an actor. The first actor inserted becomes the reference.
    pub fn insert(&mut self, actor: MeshActor) {
        let name = actor.name.clone();
        self.actors.insert(name.clone(), actor);
        if self.reference.is_none() && self.actors.len() == 1 {
            self.reference = Some(name.clone());
        }
        debug!("insert actor {name:?} complete");
    }

    /// Remove an actor, clearing the reference if it pointed at it
    pub fn remove(&mut self, name: &str) -> Result<MeshActor> {
        let actor = self
            .actors
            .remove(name)
            .ok_or_else(|| Error::UnknownActor(name.to_string()))?;
        if self.reference.as_deref() == Some(name) {
            self.reference = None;
        }
        self.bindings.remove(name);
        for others in self.bindings.values_mut() {
            others.retain(|n| n != name);
        }
        if self.actors.is_empty() {
            self.undo.clear();
        }
        debug!("remove actor {name:?} complete");
        Ok(actor)
    }

    /// Drop all actors and reset the session state
    pub fn clear(&mut self) {
        self.actors.clear();
        self.bindings.clear();
        self.reference = None;
        self.image = None;
        self.undo.clear();
        self.hidden = false;
        debug!("clear scene complete");
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actors.keys().map(String::as_str)
    }

    pub fn actors(&self) -> impl Iterator<Item = &MeshActor> {
        self.actors.values()
    }

    pub fn get(&self, name: &str) -> Option<&MeshActor> {
        self.actors.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MeshActor> {
        self.actors.get_mut(name)
    }

    /// Select the reference actor all anchored operations key off
    pub fn set_reference(&mut self, name: &str) -> Result<()> {
        if !self.actors.contains_key(name) {
            return Err(Error::UnknownActor(name.to_string()));
        }
        self.reference = Some(name.to_string());
        debug!("set_reference {name:?} complete");
        Ok(())
    }

    pub fn reference_name(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The reference actor; errors when no mesh is loaded or no reference set
    pub fn reference_actor(&self) -> Result<&MeshActor> {
        if self.actors.is_empty() {
            return Err(Error::NoMesh);
        }
        let name = self.reference.as_deref().ok_or(Error::NoReference)?;
        self.actors
            .get(name)
            .ok_or_else(|| Error::UnknownActor(name.to_string()))
    }

    fn reference_pose(&self) -> Result<Pose> {
        Ok(self.reference_actor()?.pose)
    }

    /// Record the reference pose in the undo history (called before each
    /// interactive pose edit)
    pub fn record_pose(&mut self) -> Result<()> {
        let pose = self.reference_pose()?;
        self.undo.push(pose);
        debug!("record_pose complete, {} entries", self.undo.len());
        Ok(())
    }

    /// Pop the undo history and apply the popped pose to all actors
    ///
    /// If the popped pose equals the current reference pose, one more entry
    /// is popped so undo always visibly moves when it can. Returns `false`
    /// when the history is empty.
    pub fn undo_pose(&mut self) -> Result<bool> {
        let current = self.reference_pose()?;
        let Some(mut pose) = self.undo.pop() else {
            return Ok(false);
        };
        if pose == current {
            if let Some(previous) = self.undo.pop() {
                pose = previous;
            }
        }
        self.apply_pose(pose);
        debug!("undo_pose complete");
        Ok(true)
    }

    /// Restore every actor to its ground-truth pose
    pub fn reset_gt_pose(&mut self) -> Result<()> {
        if self.actors.is_empty() {
            return Err(Error::NoMesh);
        }
        for actor in self.actors.values_mut() {
            if let Some(gt) = actor.gt_pose {
                actor.pose = gt;
            }
        }
        debug!("reset_gt_pose complete");
        Ok(())
    }

    /// Adopt the reference pose as the new ground truth for all actors
    pub fn update_gt_pose(&mut self) -> Result<()> {
        let pose = self.reference_pose()?;
        for actor in self.actors.values_mut() {
            actor.pose = pose;
            actor.gt_pose = Some(pose);
        }
        debug!("update_gt_pose complete, RT: {:?}", pose.matrix());
        Ok(())
    }

    /// Copy the reference pose onto every actor without touching ground truth
    pub fn broadcast_pose(&mut self) -> Result<()> {
        let pose = self.reference_pose()?;
        self.apply_pose(pose);
        debug!("broadcast_pose complete");
        Ok(())
    }

    /// Set the reference ground-truth pose directly (loaded from a pose file)
    /// and propagate it
    pub fn set_gt_pose(&mut self, pose: Pose) -> Result<()> {
        if self.actors.is_empty() {
            return Err(Error::NoMesh);
        }
        if self.anchored {
            for actor in self.actors.values_mut() {
                actor.pose = pose;
                actor.gt_pose = Some(pose);
            }
        } else {
            let name = self.reference.as_deref().ok_or(Error::NoReference)?;
            let actor = self
                .actors
                .get_mut(name)
                .ok_or_else(|| Error::UnknownActor(name.to_string()))?;
            actor.pose = pose;
            actor.gt_pose = Some(pose);
        }
        debug!("set_gt_pose complete, RT: {:?}", pose.matrix());
        Ok(())
    }

    fn apply_pose(&mut self, pose: Pose) {
        for actor in self.actors.values_mut() {
            actor.pose = pose;
        }
    }

    /// Copy `main`'s pose onto the listed actors
    pub fn realign(&mut self, main: &str, others: &[&str]) -> Result<()> {
        let pose = self
            .actors
            .get(main)
            .ok_or_else(|| Error::UnknownActor(main.to_string()))?
            .pose;
        for name in others {
            let actor = self
                .actors
                .get_mut(*name)
                .ok_or_else(|| Error::UnknownActor(name.to_string()))?;
            actor.pose = pose;
        }
        debug!("realign: main => {main:?}, others => {others:?} complete");
        Ok(())
    }

    /// Bind every other actor to `main` for later realignment
    pub fn bind(&mut self, main: &str) -> Result<()> {
        if !self.actors.contains_key(main) {
            return Err(Error::UnknownActor(main.to_string()));
        }
        let others: Vec<String> = self
            .actors
            .keys()
            .filter(|n| n.as_str() != main)
            .cloned()
            .collect();
        self.bindings.insert(main.to_string(), others);
        debug!("bind {main:?} complete");
        Ok(())
    }

    /// Realign the actors previously bound to `main`
    pub fn realign_bound(&mut self, main: &str) -> Result<()> {
        let others = self
            .bindings
            .get(main)
            .ok_or_else(|| Error::UnknownActor(main.to_string()))?
            .clone();
        let refs: Vec<&str> = others.iter().map(String::as_str).collect();
        self.realign(main, &refs)
    }

    /// Toggle a mirror flag on an actor (on the reference when anchored)
    pub fn mirror(&mut self, name: &str, axis: MirrorAxis) -> Result<()> {
        let name = if self.anchored {
            self.reference.as_deref().ok_or(Error::NoReference)?.to_string()
        } else {
            name.to_string()
        };
        let actor = self
            .actors
            .get_mut(&name)
            .ok_or_else(|| Error::UnknownActor(name.clone()))?;
        actor.toggle_mirror(axis);
        debug!(
            "mirror {name:?} complete, display RT: {:?}",
            actor.display_pose().matrix()
        );
        Ok(())
    }

    /// Set one actor's opacity
    pub fn set_opacity(&mut self, name: &str, opacity: f32) -> Result<()> {
        let actor = self
            .actors
            .get_mut(name)
            .ok_or_else(|| Error::UnknownActor(name.to_string()))?;
        actor.set_opacity(opacity);
        debug!("set_opacity {name:?} complete, opacity: {}", actor.opacity);
        Ok(())
    }

    /// Hide or unhide every actor except the reference
    pub fn toggle_hidden(&mut self) -> Result<()> {
        if self.actors.is_empty() {
            return Err(Error::NoMesh);
        }
        self.hidden = !self.hidden;
        let keep = if self.actors.len() == 1 {
            None
        } else {
            self.reference.clone()
        };
        for actor in self.actors.values_mut() {
            if keep.as_deref() == Some(actor.name.as_str()) {
                continue;
            }
            if self.hidden {
                actor.hide();
            } else {
                actor.unhide();
            }
        }
        debug!("toggle_hidden complete, hidden: {}", self.hidden);
        Ok(())
    }

    /// Attach the reference image plane
    pub fn set_image(&mut self, image: ImagePlane) {
        self.image = Some(image);
    }

    pub fn image(&self) -> Option<&ImagePlane> {
        self.image.as_ref()
    }

    pub fn image_mut(&mut self) -> Option<&mut ImagePlane> {
        self.image.as_mut()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }
}
