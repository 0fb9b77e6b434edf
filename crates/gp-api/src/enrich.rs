//! Navigation links on app records.
//!
//! The provider's store URL moves to `playstoreUrl`; `url` and the
//! sub-resource fields point back into this API. Records without a string
//! `appId` are returned unchanged.

use serde_json::{json, Map, Value};

use crate::links::LinkBuilder;

const SUB_RESOURCES: [&str; 4] = ["permissions", "similar", "reviews", "datasafety"];

pub fn app_with_links(app: Value, links: &LinkBuilder) -> Value {
    let Value::Object(mut record) = app else {
        return app;
    };
    let Some(app_id) = record.get("appId").and_then(Value::as_str).map(str::to_owned) else {
        return Value::Object(record);
    };

    let app_path = format!("apps/{}", urlencoding::encode(&app_id));

    if let Some(store_url) = record.remove("url") {
        record.insert("playstoreUrl".into(), store_url);
    }
    record.insert("url".into(), Value::String(links.url(&app_path)));

    for resource in SUB_RESOURCES {
        record.insert(
            resource.into(),
            Value::String(links.url(&format!("{app_path}/{resource}"))),
        );
    }

    link_developer(&mut record, links);

    Value::Object(record)
}

pub fn apps_with_links(apps: Vec<Value>, links: &LinkBuilder) -> Vec<Value> {
    apps.into_iter().map(|app| app_with_links(app, links)).collect()
}

fn link_developer(record: &mut Map<String, Value>, links: &LinkBuilder) {
    let Some(dev_id) = record.get("developer").and_then(Value::as_str).map(str::to_owned) else {
        return;
    };

    let url = links.url(&format!("developers/{}", urlencoding::encode(&dev_id)));
    record.insert("developer".into(), json!({ "devId": dev_id, "url": url }));
}
