// Raw provider payloads, as returned by the describe / metric-data / events calls.
// Field names follow the provider's PascalCase JSON; everything optional since the
// provider omits fields freely (e.g. Endpoint while an instance is still creating).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DbInstanceRecord {
    #[serde(rename = "DBInstanceIdentifier", default)]
    pub db_instance_identifier: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(rename = "DBInstanceClass", default)]
    pub db_instance_class: Option<String>,
    #[serde(rename = "DBInstanceStatus", default)]
    pub db_instance_status: Option<String>,
    #[serde(default)]
    pub allocated_storage: Option<i64>,
    #[serde(default)]
    pub endpoint: Option<EndpointRecord>,
    #[serde(rename = "MultiAZ", default)]
    pub multi_az: Option<bool>,
    #[serde(default)]
    pub publicly_accessible: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndpointRecord {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescribeDbInstancesResponse {
    #[serde(rename = "DBInstances", default)]
    pub db_instances: Vec<DbInstanceRecord>,
}

/// One metric-data series: parallel timestamp / value arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDataResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamps: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetMetricDataResponse {
    #[serde(default)]
    pub metric_data_results: Vec<MetricDataResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRecord {
    #[serde(default)]
    pub source_identifier: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeEventsResponse {
    #[serde(default)]
    pub events: Vec<EventRecord>,
}
