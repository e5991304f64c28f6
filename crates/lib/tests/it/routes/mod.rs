mod resolve;
mod reverse;
