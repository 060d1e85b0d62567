use crate::node::{Node, ScalarType};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const TASK_SUMMARY: &str = "org.kie.server.api.model.instance.TaskSummary";
const TASK_SUMMARY_LIST: &str = "org.kie.server.api.model.instance.TaskSummaryList";
const PROCESS_INSTANCE: &str = "org.kie.server.api.model.instance.ProcessInstance";
const PROCESS_INSTANCE_LIST: &str = "org.kie.server.api.model.instance.ProcessInstanceList";
const PROCESS_DEFINITION: &str = "org.kie.server.api.model.definition.ProcessDefinition";
const PROCESS_DEFINITION_LIST: &str = "org.kie.server.api.model.definition.ProcessDefinitionList";
const SERVICE_RESPONSE: &str = "org.kie.server.api.model.ServiceResponse";
const CONTAINER_RESOURCE: &str = "org.kie.server.api.model.KieContainerResource";

pub fn rest_xml_process(id: &str) -> Node {
    Node::object("processes")
        .with_child(Node::leaf("process-id", id))
        .with_child(Node::leaf("process-name", id))
        .with_child(Node::leaf("process-version", "1.0"))
        .with_child(Node::leaf("package", "org.jbpm"))
        .with_child(Node::leaf("container-id", "project_1.0"))
}

pub fn rest_xml_process_definitions(ids: &[&str]) -> Node {
    Node::object("process-definitions").with_children(ids.iter().map(|id| rest_xml_process(id)))
}

pub fn rest_xml_process_definitions_doc(ids: &[&str]) -> String {
    let processes: String = ids
        .iter()
        .map(|id| {
            format!(
                "<processes><process-id>{id}</process-id><process-name>{id}</process-name>\
                 <process-version>1.0</process-version><package>org.jbpm</package>\
                 <container-id>project_1.0</container-id></processes>"
            )
        })
        .collect();
    format!("{XML_DECLARATION}\n<process-definitions>{processes}</process-definitions>")
}

fn rest_xml_container(id: &str) -> Node {
    Node::object("kie-container")
        .with_attribute("container-id", id)
        .with_attribute("status", "STARTED")
        .with_child(
            Node::object("release-id")
                .with_child(Node::leaf("group-id", "org.kie"))
                .with_child(Node::leaf("artifact-id", id))
                .with_child(Node::leaf("version", "1.0")),
        )
}

pub fn rest_xml_containers(ids: &[&str]) -> Node {
    Node::object("response")
        .with_attribute("type", "SUCCESS")
        .with_attribute("msg", "List of created containers")
        .with_child(
            Node::object("kie-containers")
                .with_children(ids.iter().map(|id| rest_xml_container(id))),
        )
}

pub fn rest_xml_containers_doc(ids: &[&str]) -> String {
    let containers: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<kie-container container-id="{id}" status="STARTED"><release-id><group-id>org.kie</group-id><artifact-id>{id}</artifact-id><version>1.0</version></release-id></kie-container>"#
            )
        })
        .collect();
    format!(
        r#"{XML_DECLARATION}
<response type="SUCCESS" msg="List of created containers"><kie-containers>{containers}</kie-containers></response>"#
    )
}

pub fn rest_xml_process_instances_doc(ids: &[u64]) -> String {
    let instances: String = ids
        .iter()
        .map(|id| {
            format!(
                "<process-instance><process-instance-id>{id}</process-instance-id>\
                 <process-id>evaluation</process-id><process-instance-state>1</process-instance-state>\
                 <initiator>john</initiator></process-instance>"
            )
        })
        .collect();
    format!("{XML_DECLARATION}\n<process-instance-list>{instances}</process-instance-list>")
}

pub fn rest_xml_task_summaries_doc(ids: &[u64]) -> String {
    let tasks: String = ids
        .iter()
        .map(|id| {
            format!(
                "<task-summary><task-id>{id}</task-id><task-name>Review {id}</task-name>\
                 <task-status>Ready</task-status><task-priority>0</task-priority></task-summary>"
            )
        })
        .collect();
    format!("{XML_DECLARATION}\n<task-summary-list>{tasks}</task-summary-list>")
}

pub fn json_process_instances(ids: &[u64]) -> Node {
    let instances = ids.iter().map(|id| {
        Node::object("")
            .with_child(Node::scalar("process-instance-id", id.to_string(), ScalarType::Number))
            .with_child(Node::leaf("process-id", "evaluation"))
            .with_child(Node::scalar("process-instance-state", "1", ScalarType::Number))
    });
    Node::object("").with_child(Node::array("process-instance").with_children(instances))
}

pub fn json_process_instances_doc(ids: &[u64]) -> String {
    let instances: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "process-instance-id": id,
                "process-id": "evaluation",
                "process-instance-state": 1,
            })
        })
        .collect();
    serde_json::json!({ "process-instance": instances }).to_string()
}

pub fn json_process_definitions_doc(ids: &[&str]) -> String {
    let processes: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "process-id": id,
                "process-name": id,
                "process-version": "1.0",
                "package": "org.jbpm",
                "container-id": "project_1.0",
                "dynamic": false,
            })
        })
        .collect();
    serde_json::json!({ "processes": processes }).to_string()
}

pub fn json_task_summaries_doc(ids: &[u64]) -> String {
    let tasks: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "task-id": id,
                "task-name": format!("Review {id}"),
                "task-status": "Ready",
                "task-priority": 0,
            })
        })
        .collect();
    serde_json::json!({ "task-summary": tasks }).to_string()
}

pub fn json_containers(ids: &[&str]) -> Node {
    let containers = ids.iter().map(|id| {
        Node::object("")
            .with_child(Node::leaf("container-id", *id))
            .with_child(Node::leaf("status", "STARTED"))
    });
    Node::object("")
        .with_child(Node::leaf("type", "SUCCESS"))
        .with_child(Node::leaf("msg", "List of created containers"))
        .with_child(
            Node::object("result").with_child(
                Node::object("kie-containers")
                    .with_child(Node::array("kie-container").with_children(containers)),
            ),
        )
}

pub fn json_containers_doc(ids: &[&str]) -> String {
    let containers: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| serde_json::json!({ "container-id": id, "status": "STARTED" }))
        .collect();
    serde_json::json!({
        "type": "SUCCESS",
        "msg": "List of created containers",
        "result": { "kie-containers": { "kie-container": containers } },
    })
    .to_string()
}

pub fn class_xml_task_summaries(ids: &[u64]) -> Node {
    let tasks = ids.iter().map(|id| {
        Node::object(TASK_SUMMARY)
            .with_child(Node::leaf("id", id.to_string()))
            .with_child(Node::leaf("name", "Review"))
            .with_child(Node::leaf("status", "Ready"))
    });
    Node::object(TASK_SUMMARY_LIST).with_child(Node::object("tasks").with_children(tasks))
}

pub fn class_xml_task_summaries_doc(ids: &[u64]) -> String {
    let tasks: String = ids
        .iter()
        .map(|id| {
            format!(
                "<{TASK_SUMMARY}><id>{id}</id><name>Review</name><status>Ready</status></{TASK_SUMMARY}>"
            )
        })
        .collect();
    format!("<{TASK_SUMMARY_LIST}><tasks>{tasks}</tasks></{TASK_SUMMARY_LIST}>")
}

pub fn class_xml_process_definitions_doc(ids: &[&str]) -> String {
    let processes: String = ids
        .iter()
        .map(|id| {
            format!(
                "<{PROCESS_DEFINITION}><id>{id}</id><name>{id}</name><version>1.0</version>\
                 <packageName>org.jbpm</packageName><containerId>project_1.0</containerId>\
                 </{PROCESS_DEFINITION}>"
            )
        })
        .collect();
    format!(
        "<{PROCESS_DEFINITION_LIST}><processes>{processes}</processes></{PROCESS_DEFINITION_LIST}>"
    )
}

pub fn class_xml_process_instances_doc(ids: &[u64]) -> String {
    let instances: String = ids
        .iter()
        .map(|id| {
            format!(
                "<{PROCESS_INSTANCE}><id>{id}</id><processId>evaluation</processId>\
                 <state>1</state><initiator>john</initiator></{PROCESS_INSTANCE}>"
            )
        })
        .collect();
    format!(
        "<{PROCESS_INSTANCE_LIST}><processInstances>{instances}</processInstances></{PROCESS_INSTANCE_LIST}>"
    )
}

pub fn class_xml_containers_doc(ids: &[&str]) -> String {
    let containers: String = ids
        .iter()
        .map(|id| {
            format!(
                "<{CONTAINER_RESOURCE}><containerId>{id}</containerId>\
                 <status>STARTED</status></{CONTAINER_RESOURCE}>"
            )
        })
        .collect();
    format!(
        "<{SERVICE_RESPONSE}><type>SUCCESS</type><msg>List of created containers</msg>\
         <result class=\"org.kie.server.api.model.KieContainerResourceList\">\
         <kie-containers>{containers}</kie-containers></result></{SERVICE_RESPONSE}>"
    )
}

pub fn class_xml_raw_list(values: &[&str]) -> Node {
    Node::object("list").with_children(values.iter().map(|value| {
        Node::leaf("string", *value)
            .with_attribute("xmlns:xsi", XSI_NAMESPACE)
            .with_attribute("xsi:type", "xs:string")
    }))
}

pub fn class_xml_raw_list_doc(values: &[&str]) -> String {
    let items: String = values
        .iter()
        .map(|value| {
            format!(
                r#"<string xmlns:xsi="{XSI_NAMESPACE}" xsi:type="xs:string">{value}</string>"#
            )
        })
        .collect();
    format!("<list>{items}</list>")
}
