use anyhow::{anyhow, bail, Result};

use crate::{
    log_info,
    recipe::{default_presets, Preset, RecipeConfig},
    store::{load_json, save_json, KeyValueStore, ACTIVE_RECIPE_KEY, DEFAULT_CONFIG_KEY, PRESETS_KEY},
};

const ENABLE_LOGS: bool = true;

/// The baker's saved recipe, named presets, and which preset is in use.
pub struct RecipeBook<S: KeyValueStore> {
    store: S,
    config: RecipeConfig,
    presets: Vec<Preset>,
    active_recipe: Option<String>,
    pending_deletion: Option<String>,
}

impl<S: KeyValueStore> RecipeBook<S> {
    pub fn load(store: S) -> Result<Self> {
        let config = load_json(&store, DEFAULT_CONFIG_KEY)?.unwrap_or_default();
        let presets = load_json(&store, PRESETS_KEY)?.unwrap_or_else(default_presets);
        let active_recipe = load_json(&store, ACTIVE_RECIPE_KEY)?;

        Ok(Self {
            store,
            config,
            presets,
            active_recipe,
            pending_deletion: None,
        })
    }

    pub fn config(&self) -> &RecipeConfig {
        &self.config
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn active_recipe(&self) -> Option<&str> {
        self.active_recipe.as_deref()
    }

    fn find(&self, name: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Replaces the saved recipe. Edits detach it from any preset.
    pub fn set_config(&mut self, config: RecipeConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.active_recipe = None;
        save_json(&self.store, DEFAULT_CONFIG_KEY, &self.config)?;
        self.store.remove(ACTIVE_RECIPE_KEY)
    }

    pub fn load_preset(&mut self, name: &str) -> Result<&RecipeConfig> {
        let preset = self
            .find(name)
            .cloned()
            .ok_or_else(|| anyhow!("no preset named '{name}'"))?;

        self.config = preset.config;
        save_json(&self.store, DEFAULT_CONFIG_KEY, &self.config)?;
        save_json(&self.store, ACTIVE_RECIPE_KEY, &preset.name)?;
        self.active_recipe = Some(preset.name);
        Ok(&self.config)
    }

    /// Saves the current recipe under `name`, replacing a preset of the same name.
    pub fn save_preset(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("preset name is required");
        }
        self.config.validate()?;

        let preset = Preset {
            name: name.to_string(),
            config: self.config.clone(),
        };
        match self
            .presets
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
        save_json(&self.store, PRESETS_KEY, &self.presets)?;

        self.active_recipe = Some(name.to_string());
        save_json(&self.store, ACTIVE_RECIPE_KEY, name)?;
        log_info!("Saved preset '{}'", name);
        Ok(())
    }

    pub fn request_delete_preset(&mut self, name: &str) -> Result<()> {
        let preset = self
            .find(name)
            .ok_or_else(|| anyhow!("no preset named '{name}'"))?;
        self.pending_deletion = Some(preset.name.clone());
        Ok(())
    }

    pub fn confirm_delete_preset(&mut self) -> Result<Option<Preset>> {
        let Some(name) = self.pending_deletion.take() else {
            return Ok(None);
        };
        let Some(index) = self.presets.iter().position(|p| p.name == name) else {
            return Ok(None);
        };
        let removed = self.presets.remove(index);
        save_json(&self.store, PRESETS_KEY, &self.presets)?;

        if self.active_recipe.as_deref() == Some(name.as_str()) {
            self.active_recipe = None;
            self.store.remove(ACTIVE_RECIPE_KEY)?;
        }
        log_info!("Deleted preset '{}'", name);
        Ok(Some(removed))
    }

    pub fn cancel_delete_preset(&mut self) -> Option<String> {
        self.pending_deletion.take()
    }
}
