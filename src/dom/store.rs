/// `chrome.storage.local` adapter

use crate::dom::describe;
use crate::error::StoreError;
use crate::storage::KeyValueStore;
use js_sys::{Object, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Bindings to the extension storage area
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    async fn storage_get(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    async fn storage_set(items: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = remove)]
    async fn storage_remove(keys: JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStore;

impl KeyValueStore for ChromeStore {
    async fn get_value(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let items = storage_get(JsValue::from_str(key))
            .await
            .map_err(|e| StoreError::backend(key, describe(&e)))?;
        let value = Reflect::get(&items, &JsValue::from_str(key))
            .map_err(|e| StoreError::backend(key, describe(&e)))?;

        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::codec(key, e.to_string()))
    }

    async fn set_value(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let value = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StoreError::codec(key, e.to_string()))?;

        let items = Object::new();
        Reflect::set(&items, &JsValue::from_str(key), &value)
            .map_err(|e| StoreError::backend(key, describe(&e)))?;

        storage_set(items.into())
            .await
            .map(|_| ())
            .map_err(|e| StoreError::backend(key, describe(&e)))
    }

    async fn remove_value(&self, key: &str) -> Result<(), StoreError> {
        storage_remove(JsValue::from_str(key))
            .await
            .map(|_| ())
            .map_err(|e| StoreError::backend(key, describe(&e)))
    }
}
