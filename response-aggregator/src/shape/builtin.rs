//! Built-in shape tables for the three wire formats.

use super::{FieldRef, ShapeDescriptor};
use crate::config::RawListRoot;
use crate::node::{ResponseKind, WireFormat};

const DEFINITION_PACKAGE: &str = "org.kie.server.api.model.definition";
const INSTANCE_PACKAGE: &str = "org.kie.server.api.model.instance";
const MODEL_PACKAGE: &str = "org.kie.server.api.model";

pub(super) fn shapes() -> Vec<ShapeDescriptor> {
    let mut shapes = rest_xml_shapes();
    shapes.extend(json_shapes());
    shapes.extend(class_xml_shapes());
    shapes
}

pub(super) fn raw_list_roots() -> Vec<RawListRoot> {
    let rest_xml = ["list"].into_iter().map(|root| RawListRoot {
        format: WireFormat::RestXml,
        root: root.to_string(),
    });
    let class_xml = [
        "list",
        "java.util.ArrayList",
        "java.util.LinkedList",
        "java.util.Arrays$ArrayList",
    ]
    .into_iter()
    .map(|root| RawListRoot {
        format: WireFormat::ClassXml,
        root: root.to_string(),
    });

    rest_xml.chain(class_xml).collect()
}

/// Fields shared by the REST-XML and JSON conventions, which use the same names.
fn with_dashed_fields(shape: ShapeDescriptor) -> ShapeDescriptor {
    match shape.kind {
        ResponseKind::ProcessDefinitions => shape
            .field("ProcessId", FieldRef::child("process-id"))
            .field("ProcessName", FieldRef::child("process-name"))
            .field("ProcessVersion", FieldRef::child("process-version"))
            .field("Project", FieldRef::child("package"))
            .field("ContainerId", FieldRef::child("container-id")),
        ResponseKind::ProcessInstances => shape
            .field("ProcessInstanceId", FieldRef::child("process-instance-id"))
            .field("ProcessId", FieldRef::child("process-id"))
            .field("ProcessName", FieldRef::child("process-name"))
            .field("ProcessVersion", FieldRef::child("process-version"))
            .field("Status", FieldRef::child("process-instance-state"))
            .field("Identity", FieldRef::child("initiator"))
            .field("Start", FieldRef::child("start-date"))
            .field("ContainerId", FieldRef::child("container-id")),
        ResponseKind::TaskSummaries => shape
            .field("TaskId", FieldRef::child("task-id"))
            .field("Task", FieldRef::child("task-name"))
            .field("Description", FieldRef::child("task-description"))
            .field("Status", FieldRef::child("task-status"))
            .field("Priority", FieldRef::child("task-priority"))
            .field("ActualOwner", FieldRef::child("task-actual-owner"))
            .field("CreatedBy", FieldRef::child("task-created-by"))
            .field("CreatedOn", FieldRef::child("task-created-on"))
            .field("ProcessInstanceId", FieldRef::child("task-proc-inst-id"))
            .field("ProcessId", FieldRef::child("task-proc-def-id"))
            .field("ContainerId", FieldRef::child("task-container-id")),
        _ => shape,
    }
}

fn rest_xml_shapes() -> Vec<ShapeDescriptor> {
    let format = WireFormat::RestXml;
    vec![
        with_dashed_fields(
            ShapeDescriptor::new(ResponseKind::ProcessDefinitions, format)
                .root("process-definitions")
                .item("processes"),
        ),
        with_dashed_fields(
            ShapeDescriptor::new(ResponseKind::ProcessInstances, format)
                .root("process-instance-list")
                .item("process-instance"),
        ),
        with_dashed_fields(
            ShapeDescriptor::new(ResponseKind::TaskSummaries, format)
                .root("task-summary-list")
                .item("task-summary"),
        ),
        ShapeDescriptor::new(ResponseKind::Containers, format)
            .root("response")
            .with_wrapper(&["kie-containers"])
            .item("kie-container")
            .field("ContainerId", FieldRef::attribute("container-id"))
            .field("Status", FieldRef::attribute("status")),
    ]
}

fn json_shapes() -> Vec<ShapeDescriptor> {
    let format = WireFormat::Json;
    vec![
        with_dashed_fields(
            ShapeDescriptor::new(ResponseKind::ProcessDefinitions, format)
                .with_wrapper(&["processes"]),
        ),
        with_dashed_fields(
            ShapeDescriptor::new(ResponseKind::ProcessInstances, format)
                .with_wrapper(&["process-instance"]),
        ),
        with_dashed_fields(
            ShapeDescriptor::new(ResponseKind::TaskSummaries, format)
                .with_wrapper(&["task-summary"]),
        ),
        ShapeDescriptor::new(ResponseKind::Containers, format)
            .signature(&["result", "kie-containers"])
            .with_wrapper(&["result", "kie-containers", "kie-container"])
            .field("ContainerId", FieldRef::child("container-id"))
            .field("Status", FieldRef::child("status")),
    ]
}

fn class_xml_shapes() -> Vec<ShapeDescriptor> {
    let format = WireFormat::ClassXml;
    vec![
        ShapeDescriptor::new(ResponseKind::ProcessDefinitions, format)
            .root(&format!("{DEFINITION_PACKAGE}.ProcessDefinitionList"))
            .with_wrapper(&["processes"])
            .item(&format!("{DEFINITION_PACKAGE}.ProcessDefinition"))
            .field("ProcessId", FieldRef::child("id"))
            .field("ProcessName", FieldRef::child("name"))
            .field("ProcessVersion", FieldRef::child("version"))
            .field("Project", FieldRef::child("packageName"))
            .field("ContainerId", FieldRef::child("containerId")),
        ShapeDescriptor::new(ResponseKind::ProcessInstances, format)
            .root(&format!("{INSTANCE_PACKAGE}.ProcessInstanceList"))
            .with_wrapper(&["processInstances"])
            .item(&format!("{INSTANCE_PACKAGE}.ProcessInstance"))
            .field("ProcessInstanceId", FieldRef::child("id"))
            .field("ProcessId", FieldRef::child("processId"))
            .field("ProcessName", FieldRef::child("processName"))
            .field("ProcessVersion", FieldRef::child("processVersion"))
            .field("Status", FieldRef::child("state"))
            .field("Identity", FieldRef::child("initiator"))
            .field("Start", FieldRef::child("date"))
            .field("ContainerId", FieldRef::child("containerId")),
        ShapeDescriptor::new(ResponseKind::TaskSummaries, format)
            .root(&format!("{INSTANCE_PACKAGE}.TaskSummaryList"))
            .with_wrapper(&["tasks"])
            .item(&format!("{INSTANCE_PACKAGE}.TaskSummary"))
            .field("TaskId", FieldRef::child("id"))
            .field("Task", FieldRef::child("name"))
            .field("Description", FieldRef::child("description"))
            .field("Status", FieldRef::child("status"))
            .field("Priority", FieldRef::child("priority"))
            .field("ActualOwner", FieldRef::child("actualOwner"))
            .field("CreatedBy", FieldRef::child("createdBy"))
            .field("CreatedOn", FieldRef::child("createdOn"))
            .field("ProcessInstanceId", FieldRef::child("processInstanceId"))
            .field("ProcessId", FieldRef::child("processId"))
            .field("ContainerId", FieldRef::child("containerId")),
        ShapeDescriptor::new(ResponseKind::Containers, format)
            .root(&format!("{MODEL_PACKAGE}.ServiceResponse"))
            .with_wrapper(&["result", "kie-containers"])
            .item(&format!("{MODEL_PACKAGE}.KieContainerResource"))
            .field("ContainerId", FieldRef::child("containerId"))
            .field("Status", FieldRef::child("status")),
    ]
}
